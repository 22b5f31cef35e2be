use std::time::Duration;

use mousewatch::{MouseEventKind, MouseWatcher};
use tracing_subscriber::EnvFilter;

fn main() -> mousewatch::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let watcher = MouseWatcher::new();

    watcher.subscribe(MouseEventKind::LeftDrag, |ev| {
        println!("left drag  -> ({}, {})", ev.x, ev.y);
    })?;
    watcher.subscribe(MouseEventKind::RightDrag, |ev| {
        println!("right drag -> ({}, {})", ev.x, ev.y);
    })?;

    // Advisory: watching alone should not pin an embedding runtime open.
    watcher.unref();

    println!("drag somewhere with the left or right button held (20s)...");
    std::thread::sleep(Duration::from_secs(20));

    watcher.destroy();
    Ok(())
}
