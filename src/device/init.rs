use crate::{device::file_device::FileDrumArray, shell::BootProgress, vspace::VirtualSpace};
use std::sync::mpsc::Sender;

/// 启动阶段的设备初始化：打开（或新建）备份文件并挂载虚拟地址空间，
/// 通过 channel 把进度汇报给 shell 的启动画面。
pub fn perform_device_initialization(tx: Sender<BootProgress>) {
    const IMAGE_PATH: &str = "drum.img";

    tx.send(BootProgress::Step("🥁 Initializing drum array..."))
        .unwrap();

    let image_exists = std::path::Path::new(IMAGE_PATH).exists();

    // 初始化 FileDrumArray
    let device = match FileDrumArray::open(IMAGE_PATH) {
        Ok(d) => d,
        Err(e) => {
            tx.send(BootProgress::Finished(Err(Box::new(e)))).unwrap();
            return;
        }
    };

    if !image_exists {
        tx.send(BootProgress::Step(
            "🔧 No image found, creating a zeroed drum array...",
        ))
        .unwrap();
    }

    for i in 0..=50 {
        let _ = tx.send(BootProgress::Progress(i));
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    tx.send(BootProgress::Step("⚙️  Mounting virtual address space..."))
        .unwrap();

    let mut vspace = VirtualSpace::new(device);
    if let Err(e) = vspace.mount() {
        tx.send(BootProgress::Finished(Err(Box::new(e)))).unwrap();
        return;
    }

    for i in 50..=100 {
        let _ = tx.send(BootProgress::Progress(i));
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    tx.send(BootProgress::Finished(Ok(vspace))).unwrap();
}
