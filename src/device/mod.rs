pub mod drum_device;
pub mod file_device;
pub mod header;
pub mod init;
pub mod instruction;
pub mod ram_device;
pub mod types;

pub use drum_device::{DeviceError, DrumDevice};
pub use file_device::FileDrumArray;
pub use types::{Block, BLOCKS_PER_DRUM, BLOCK_SIZE, DRUM_COUNT, DRUM_SIZE, TOTAL_SIZE};
