use crate::shell::command::Command;
use crate::utils::parse_number;

pub fn parse_command(input: &str) -> Option<Command> {
    let tokens: Vec<&str> = input.trim().split_ascii_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    let cmd = tokens[0];
    let args = &tokens[1..];

    match cmd {
        "help" => Some(Command::Help),
        "info" => Some(Command::Info),
        "mount" => Some(Command::Mount),
        "unmount" => Some(Command::Unmount),
        "read" => {
            if args.len() >= 2 {
                Some(Command::Read(parse_u32(args[0])?, parse_u32(args[1])?))
            } else {
                None
            }
        }
        "write" => {
            if args.len() >= 2 {
                Some(Command::Write(parse_u32(args[0])?, args[1..].join(" ")))
            } else {
                None
            }
        }
        "fill" => {
            if args.len() >= 3 {
                Some(Command::Fill(
                    parse_u32(args[0])?,
                    parse_u32(args[1])?,
                    parse_u8(args[2])?,
                ))
            } else {
                None
            }
        }
        "format" => Some(Command::Format),
        "exit" => Some(Command::Exit),
        _ => None,
    }
}

fn parse_u32(s: &str) -> Option<u32> {
    u32::try_from(parse_number(s)?).ok()
}

fn parse_u8(s: &str) -> Option<u8> {
    u8::try_from(parse_number(s)?).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_read_with_hex_args() {
        let cmd = parse_command("read 0x100 32").unwrap();
        assert!(matches!(cmd, Command::Read(256, 32)));
    }

    #[test]
    fn write_joins_remaining_tokens() {
        let cmd = parse_command("write 10 hello drum world").unwrap();
        match cmd {
            Command::Write(addr, text) => {
                assert_eq!(addr, 10);
                assert_eq!(text, "hello drum world");
            }
            _ => panic!("expected write"),
        }
    }

    #[test]
    fn rejects_missing_and_bad_arguments() {
        assert!(parse_command("read 10").is_none());
        assert!(parse_command("read ten 5").is_none());
        assert!(parse_command("fill 0 4 999").is_none()); // 填充值必须是一个字节
        assert!(parse_command("bogus").is_none());
        assert!(parse_command("").is_none());
    }
}
