pub mod command;
pub mod parse;

use crate::device::{file_device::FileDrumArray, init::perform_device_initialization};
use crate::shell::{command::execute_command, parse::parse_command};
use crate::vspace::VirtualSpace;
use colored::*;
use crossterm::{
    cursor, execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use reedline::{DefaultCompleter, DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use std::{error::Error, io::stdout, path::PathBuf, sync::mpsc, thread};

/// 初始化线程发回的启动进度事件
pub enum BootProgress {
    Step(&'static str),
    Progress(u64),
    Finished(Result<VirtualSpace<FileDrumArray>, Box<dyn Error + Send + Sync>>),
}

pub fn start_shell() {
    let mut vspace = match boot_screen() {
        Ok(v) => v,
        Err(e) => {
            println!("{} {}", "❌ Boot failed:".red().bold(), e);
            return;
        }
    };

    let username = whoami::username();
    let hostname = whoami::hostname();

    println!(
        "{}",
        "Type 'help' for available commands. Use ↑↓ for history, Tab for auto-completion.\n"
            .bright_black()
    );

    // 初始化 reedline
    let histroy_path = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".minidrum_history");

    let mut line_editor = Reedline::create().with_history(Box::new(
        reedline::FileBackedHistory::with_file(100, histroy_path.clone()).unwrap(),
    ));

    // 命令补全
    let commands: Vec<String> = [
        "help", "info", "mount", "unmount", "read", "write", "fill", "format", "exit",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let completer = DefaultCompleter::new_with_wordlen(commands, 2);
    line_editor = line_editor.with_completer(Box::new(completer));

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(format!(
            "{}@{}",
            username.green().bold(),
            hostname.cyan().bold()
        )),
        DefaultPromptSegment::Basic("MiniDrum".bright_blue().bold().to_string()),
    );

    loop {
        let input = line_editor.read_line(&prompt);

        match input {
            Ok(Signal::Success(buffer)) => {
                let trimmed = buffer.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Some(cmd) => {
                        if let Err(e) = execute_command(&cmd, &mut vspace) {
                            println!("{} {}", "❌ Error:".red().bold(), e);
                        }
                        if matches!(cmd, command::Command::Exit) {
                            break;
                        }
                    }
                    None => println!(
                        "{}",
                        "⚠️  Unknown command or bad arguments. Type 'help' for command list."
                            .yellow()
                    ),
                }
            }
            Ok(Signal::CtrlC) => {
                println!();
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("{}", "Exiting MiniDrum...".yellow());
                break;
            }
            Err(e) => {
                println!("Error reading line: {}", e);
                break;
            }
        }
    }

    // 退出前尽量干净地卸载（用户可能已经手动卸载过）
    let _ = vspace.unmount();
    println!("{}", "GoodBye!".bright_yellow());
}

/// 启动画面：清屏、跑初始化线程、渲染进度，返回挂载好的地址空间
fn boot_screen() -> Result<VirtualSpace<FileDrumArray>, Box<dyn Error + Send + Sync>> {
    let mut stdout = stdout();

    execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0)).unwrap();
    println!("{}", "[MiniDrum Booting...]".bright_yellow().bold());

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || perform_device_initialization(tx));

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap()
            .progress_chars("=> "),
    );

    let result = loop {
        match rx.recv() {
            Ok(BootProgress::Step(msg)) => pb.println(msg),
            Ok(BootProgress::Progress(i)) => pb.set_position(i),
            Ok(BootProgress::Finished(res)) => break res,
            Err(e) => break Err(Box::new(e) as Box<dyn Error + Send + Sync>),
        }
    };
    let vspace = result?;
    pb.finish_with_message("✅ Ready!");

    execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print("\nWelcome to MiniDrum v0.1.0\n"),
        ResetColor
    )
    .unwrap();

    Ok(vspace)
}
