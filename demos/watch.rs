use mousewatch::{MouseEventKind, MouseWatcher};
use tracing_subscriber::EnvFilter;

fn main() -> mousewatch::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let watcher = MouseWatcher::new();

    // One subscription per kind; every event prints as `kind (x, y)`.
    // The OS hook starts on the first of these calls.
    for kind in MouseEventKind::ALL {
        watcher.subscribe(kind, |ev| println!("{}", ev))?;
    }

    println!("watching global mouse input, press Enter to stop");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line).ok();

    watcher.destroy();
    Ok(())
}
