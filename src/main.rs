#[tokio::main]
async fn main() {
  // Minimal CLI: support --version/-V
  let mut args = std::env::args().skip(1);
  if let Some(arg) = args.next() {
    if arg == "--version" || arg == "-V" {
      println!("offerdocs {}", env!("CARGO_PKG_VERSION"));
      return;
    }
    if arg == "--help" || arg == "-h" {
      eprintln!("Usage: offerdocs [--version]");
      eprintln!();
      eprintln!("Environment:");
      eprintln!("  OFFERDOCS_DATABASE    sqlx URL (default sqlite://offerdocs.db)");
      eprintln!("  OFFERDOCS_ADDR        listen address (default 127.0.0.1:3811)");
      eprintln!("  OFFERDOCS_UPLOAD_DIR  blob directory (default uploads)");
      eprintln!("  OFFERDOCS_PUBLIC_URL  origin used in file paths (default http://<addr>)");
      return;
    }
  }

  if let Err(e) = offerdocs::app::run().await {
    eprintln!("error: {e}");
    std::process::exit(1);
  }
}
