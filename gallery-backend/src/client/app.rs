// gallery-backend/src/client/app.rs

use std::fmt::Write;

use tracing::warn;

use super::{ClientError, GalleryClient, ImageFile};
use crate::api::dto::submission_dto::SubmissionRecord;

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Submission successful!";
pub const SUBMIT_FAILURE_MESSAGE: &str = "Submission failed. Please try again.";
pub const FETCH_FAILURE_MESSAGE: &str = "Failed to fetch submissions";

/// 入力中のフォーム内容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    pub name: String,
    pub social_handle: String,
    pub images: Vec<ImageFile>,
}

impl SubmissionForm {
    pub fn add_image(&mut self, image: ImageFile) {
        self.images.push(image);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 画面状態（リロードで失われ、一覧は API から取り直す）
#[derive(Debug)]
pub struct GalleryApp {
    client: GalleryClient,
    pub form: SubmissionForm,
    pub submissions: Vec<SubmissionRecord>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl GalleryApp {
    pub fn new(client: GalleryClient) -> Self {
        Self {
            client,
            form: SubmissionForm::default(),
            submissions: Vec::new(),
            is_loading: false,
            error: None,
            success: None,
        }
    }

    /// 送信ボタンが押せる状態か
    pub fn can_submit(&self) -> bool {
        !self.is_loading
    }

    /// 一覧を取り直す。失敗時は表示中の一覧を残したままエラーを出す
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.client.list_submissions().await {
            Ok(submissions) => {
                self.submissions = submissions;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch submissions");
                self.error = Some(FETCH_FAILURE_MESSAGE.to_string());
                Err(err)
            }
        }
    }

    /// フォームを送信する
    ///
    /// 送信中は `false` を返して何もしない。成功時はフォームをリセットして一覧を取り直し、
    /// 失敗時は入力内容を残したままエラーメッセージを設定する。
    pub async fn submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }

        self.is_loading = true;
        self.error = None;
        self.success = None;

        let result = self
            .client
            .submit(&self.form.name, &self.form.social_handle, &self.form.images)
            .await;

        match result {
            Ok(_) => {
                self.success = Some(SUBMIT_SUCCESS_MESSAGE.to_string());
                self.form.reset();
                // 一覧の取得失敗は error に反映済み
                let _ = self.refresh().await;
            }
            Err(err) => {
                warn!(error = %err, "Submission failed");
                self.error = Some(SUBMIT_FAILURE_MESSAGE.to_string());
            }
        }

        self.is_loading = false;
        true
    }

    /// テキスト表示（フォームの状態・メッセージ・2列の画像グリッド）
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Social Media Submission");
        let _ = writeln!(
            out,
            "[{}]",
            if self.is_loading { "Submitting..." } else { "Submit" }
        );
        if let Some(error) = &self.error {
            let _ = writeln!(out, "error: {}", error);
        }
        if let Some(success) = &self.success {
            let _ = writeln!(out, "success: {}", success);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Submissions");
        for submission in &self.submissions {
            let _ = writeln!(out, "- {}", submission.name);
            let _ = writeln!(out, "  {}", submission.social_handle);
            for row in submission.images.chunks(2) {
                let _ = writeln!(out, "    {}", row.join("  |  "));
            }
        }

        out
    }
}
