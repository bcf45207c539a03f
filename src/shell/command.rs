use chrono::{Local, TimeZone};
use colored::*;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::{thread, time::Duration};

use crate::device::file_device::{DeviceStatus, FileDrumArray};
use crate::device::types::{BLOCKS_PER_DRUM, BLOCK_SIZE, DRUM_COUNT, TOTAL_SIZE};
use crate::vspace::VirtualSpace;

#[derive(Debug)]
pub enum Command {
    Help,
    Info,
    Mount,
    Unmount,
    Read(u32, u32),     // 起始地址，长度
    Write(u32, String), // 起始地址，文本内容
    Fill(u32, u32, u8), // 起始地址，长度，填充字节
    Format,
    Exit,
}

pub fn execute_command(
    cmd: &Command,
    vspace: &mut VirtualSpace<FileDrumArray>,
) -> Result<(), Box<dyn Error>> {
    match cmd {
        Command::Help => print_help(),
        Command::Info => print_info(vspace),
        Command::Mount => {
            vspace.mount()?;
            println!("{}", "✅ Address space mounted".green());
        }
        Command::Unmount => {
            vspace.unmount()?;
            println!("{}", "💾 Address space unmounted".green());
        }
        Command::Read(addr, len) => {
            if *len as u64 > TOTAL_SIZE {
                println!(
                    "{}",
                    "⚠️  Requested length exceeds the whole address space.".yellow()
                );
                return Ok(());
            }
            let mut buf = vec![0u8; *len as usize];
            vspace.read(*addr, &mut buf)?;
            print_hexdump(*addr, &buf);
        }
        Command::Write(addr, text) => {
            vspace.write(*addr, text.as_bytes())?;
            println!(
                "✏️  Wrote {} bytes at {}",
                text.len().to_string().green(),
                format!("{:#x}", addr).cyan()
            );
        }
        Command::Fill(addr, len, value) => {
            if *len as u64 > TOTAL_SIZE {
                println!(
                    "{}",
                    "⚠️  Requested length exceeds the whole address space.".yellow()
                );
                return Ok(());
            }
            let buf = vec![*value; *len as usize];
            vspace.write(*addr, &buf)?;
            println!(
                "✏️  Filled {} bytes at {} with {:#04x}",
                len.to_string().green(),
                format!("{:#x}", addr).cyan(),
                value
            );
        }
        Command::Format => {
            let confirmed = Confirm::new()
                .with_prompt("⚠️  This will zero-fill every drum. Continue?")
                .default(false)
                .interact()?;
            if !confirmed {
                println!("{}", "Format cancelled.".bright_black());
                return Ok(());
            }

            println!("💾 Formatting drum array...");
            let pb = ProgressBar::new(DRUM_COUNT as u64);
            pb.set_style(
                ProgressStyle::with_template("[{bar:40.green/black}] {pos:>2}/{len} {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            for drum in 0..DRUM_COUNT as u32 {
                vspace.format_drum(drum)?;
                pb.set_position(drum as u64 + 1);
                thread::sleep(Duration::from_millis(30));
            }
            pb.finish_with_message("✅ Drum array formatted!");
        }
        Command::Exit => println!("{}", "👋 Exiting MiniDrum shell...".yellow().bold()),
    }

    Ok(())
}

fn print_info(vspace: &VirtualSpace<FileDrumArray>) {
    let header = vspace.device().header();
    let status = vspace.device().status();

    let created = Local
        .timestamp_opt(header.created_at as i64, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let state = if status.contains(DeviceStatus::MOUNTED) {
        if status.contains(DeviceStatus::DIRTY) {
            "mounted (dirty)"
        } else {
            "mounted"
        }
    } else {
        "unmounted"
    };

    println!("{}", "📊 Drum Array Info".bright_yellow().bold());
    println!("{}: {}", "Label".blue(), header.label);
    println!("{}: {}", "Volume".blue(), header.volume_id);
    println!(
        "{}: {} drums x {} blocks x {} bytes = {} KB",
        "Geometry".blue(),
        DRUM_COUNT,
        BLOCKS_PER_DRUM,
        BLOCK_SIZE,
        TOTAL_SIZE / 1024
    );
    println!("{}: {}", "Created".blue(), created);
    println!("{}: {}", "Mounts".blue(), header.mount_count);
    println!("{}: {}", "State".blue(), state);
}

/// 按 16 字节一行打印十六进制 + ASCII 视图
fn print_hexdump(addr: u32, data: &[u8]) {
    for (i, chunk) in data.chunks(16).enumerate() {
        let line_addr = addr as usize + i * 16;
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| if (0x20..0x7f).contains(&b) { b as char } else { '.' })
            .collect();
        println!(
            "{}  {:<47}  {}",
            format!("{:#08x}", line_addr).cyan(),
            hex.join(" "),
            ascii.bright_black()
        );
    }
}

fn print_help() {
    println!("{}", "📘 MiniDrum Commands".bright_cyan().bold());
    println!(
        "{}",
        "
  info                     Show drum array info
  mount                    Mount the virtual address space
  unmount                  Unmount the virtual address space
  read <addr> <len>        Hexdump <len> bytes starting at <addr>
  write <addr> <text>      Write <text> at <addr>
  fill <addr> <len> <byte> Fill a range with one byte value
  format                   Zero-fill every drum
  help                     Show this help message
  exit                     Quit the shell

  Addresses and lengths accept decimal or 0x-prefixed hex.
"
        .bright_black()
    );
}
