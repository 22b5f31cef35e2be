use std::time::Duration;

use mousewatch::{MouseEventKind, MouseWatcher};
use tracing_subscriber::EnvFilter;

/// Records the global mouse stream as JSON lines on stdout, one event per
/// line, ready for `jq` or later replay:
///
/// ```text
/// {"kind":"left-down","x":741,"y":418}
/// {"kind":"left-drag","x":744,"y":420}
/// ```
fn main() -> mousewatch::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let watcher = MouseWatcher::new();

    for kind in MouseEventKind::ALL {
        watcher.subscribe(kind, |ev| {
            if let Ok(line) = serde_json::to_string(&ev) {
                println!("{}", line);
            }
        })?;
    }

    std::thread::sleep(Duration::from_secs(10));
    watcher.destroy();
    Ok(())
}
