use gallery_backend::client::app::GalleryApp;
use gallery_backend::client::{GalleryClient, ImageFile, DEFAULT_API_URL};
use std::env;

const USAGE: &str = "Usage:
  gallery-client list
  gallery-client submit <name> <social-handle> <image>...

Environment:
  GALLERY_API_URL  API base URL (default http://localhost:3001)";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallery_backend=warn".into()),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let api_url = env::var("GALLERY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let mut app = GalleryApp::new(GalleryClient::new(api_url));

    match args.first().map(String::as_str) {
        Some("list") => {
            // 失敗時のメッセージは画面状態に入るので render で表示する
            let _ = app.refresh().await;
        }
        Some("submit") if args.len() >= 4 => {
            app.form.name = args[1].clone();
            app.form.social_handle = args[2].clone();

            for path in &args[3..] {
                match ImageFile::from_path(path).await {
                    Ok(image) => app.form.add_image(image),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            }

            app.submit().await;
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    print!("{}", app.render());

    if app.error.is_some() {
        std::process::exit(1);
    }
}
