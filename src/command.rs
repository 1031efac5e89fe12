//! 원격 명령 프로토콜
//!
//! 실제 경계를 넘는 것은 줄바꿈으로 끝나는 셸 명령 문자열뿐이다:
//! 1. `> 경로`                       - truncate/생성
//! 2. `printf "\NNN..." >> 경로`     - 청크마다 한 번, 순서대로
//! 3. `wc -c < 경로`                 - 크기 검증 질의
//! 4. `exit`                         - 파이프 드라이버 종료

use std::borrow::Cow;

/// 파이프 드라이버 종료 명령
pub const EXIT_COMMAND: &str = "exit";

/// 바이트 청크를 8진수 이스케이프 문자열로 변환
///
/// 모든 바이트가 3자리 0 패딩 8진수 `\NNN`이 된다. NUL/제어 문자/따옴표/
/// 백슬래시를 포함한 임의 바이너리가 텍스트 명령 채널을 안전하게 통과하고,
/// `%`가 남지 않으므로 printf 포맷 문자열로 그대로 쓸 수 있다.
pub fn octal_escape(chunk: &[u8]) -> String {
    let mut escaped = String::with_capacity(chunk.len() * 4);
    for byte in chunk {
        escaped.push_str(&format!("\\{:03o}", byte));
    }
    escaped
}

/// 원격 경로를 셸 인용 처리
fn quote_path(remote_path: &str) -> Cow<'_, str> {
    shell_escape::escape(Cow::Borrowed(remote_path))
}

/// 원격 파일 truncate/생성 명령
pub fn truncate_command(remote_path: &str) -> String {
    format!("> {}", quote_path(remote_path))
}

/// 청크 append 명령
///
/// 빈 청크는 명령을 만들지 않는다 (`printf ""`는 무의미한 명령이 됨)
pub fn append_command(chunk: &[u8], remote_path: &str) -> Option<String> {
    if chunk.is_empty() {
        return None;
    }
    Some(format!(
        "printf \"{}\" >> {}",
        octal_escape(chunk),
        quote_path(remote_path)
    ))
}

/// 원격 파일 바이트 수 질의 명령
pub fn size_command(remote_path: &str) -> String {
    format!("wc -c < {}", quote_path(remote_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_octal_escape_special_bytes() {
        // NUL, 줄바꿈, 큰따옴표, 백슬래시
        assert_eq!(octal_escape(&[0x00]), "\\000");
        assert_eq!(octal_escape(&[0x0A]), "\\012");
        assert_eq!(octal_escape(&[0x22]), "\\042");
        assert_eq!(octal_escape(&[0x5C]), "\\134");
        assert_eq!(octal_escape(&[0xFF]), "\\377");
    }

    #[test]
    fn test_octal_escape_expansion_ratio() {
        // 바이트당 4문자: 800바이트 청크 -> 3200문자 명령 본문
        let chunk = vec![0xABu8; 800];
        assert_eq!(octal_escape(&chunk).len(), 3200);
    }

    #[test]
    fn test_octal_escape_never_emits_percent() {
        let all_bytes: Vec<u8> = (0..=255).collect();
        let escaped = octal_escape(&all_bytes);
        assert!(!escaped.contains('%'));
        assert!(!escaped.contains('"'));
    }

    #[test]
    fn test_append_command_shape() {
        let cmd = append_command(&[0x41, 0x42], "/home/1.png").unwrap();
        assert_eq!(cmd, "printf \"\\101\\102\" >> /home/1.png");
    }

    #[test]
    fn test_append_command_empty_chunk() {
        assert!(append_command(&[], "/home/1.png").is_none());
    }

    #[test]
    fn test_truncate_and_size_commands() {
        assert_eq!(truncate_command("/home/1.png"), "> /home/1.png");
        assert_eq!(size_command("/home/1.png"), "wc -c < /home/1.png");
    }

    #[test]
    fn test_path_with_spaces_is_quoted() {
        let cmd = truncate_command("/home/my file.png");
        assert_eq!(cmd, "> '/home/my file.png'");
    }
}
