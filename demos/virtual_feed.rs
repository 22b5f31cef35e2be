use mousewatch::{MouseEventKind, MouseWatcher, VirtualMouse};

fn main() -> mousewatch::Result<()> {
    // A scripted source: runs the full pipeline on any platform, no hook.
    let mouse = VirtualMouse::new();
    let watcher = MouseWatcher::with_source(mouse.opener());

    for kind in MouseEventKind::ALL {
        watcher.subscribe(kind, |ev| println!("(virtual) {}", ev))?;
    }

    // A click, then a short left drag.
    mouse.move_to(100, 100);
    mouse.press_left(100, 100);
    mouse.release_left(100, 100);
    mouse.press_left(100, 100);
    mouse.move_to(120, 104);
    mouse.move_to(140, 108);
    mouse.release_left(140, 108);

    // And a right drag for the other button.
    mouse.press_right(140, 108);
    mouse.move_to(150, 110);
    mouse.release_right(150, 110);

    watcher.destroy();
    mouse.move_to(0, 0); // silence: the watcher is gone
    Ok(())
}
