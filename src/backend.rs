//! 백엔드 선택
//!
//! 제어 머신의 OS와 로컬 도구 유무로 시도할 백엔드 후보 목록을 정한다.
//! 실패한 백엔드는 재시도하지 않고, 부분 진행도 백엔드 간에 이어지지 않는다.

use std::fmt;
use std::process::{Command, Stdio};

use tracing::debug;

/// 전송 백엔드 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// russh 클라이언트 라이브러리 (키/비밀번호 인증)
    ClientLibrary,

    /// sshpass 래퍼 + OpenSSH (비밀번호 인증, Unix 전용)
    Sshpass,

    /// 로컬 OpenSSH 클라이언트 대화형 세션 (키 인증)
    OpenSsh,

    /// 최후 수단 subprocess 파이프
    RawPipe,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::ClientLibrary => "russh",
            BackendKind::Sshpass => "sshpass",
            BackendKind::OpenSsh => "openssh",
            BackendKind::RawPipe => "pipe",
        };
        write!(f, "{}", name)
    }
}

/// 제어 머신 OS 종류 (로컬 감지, 원격 아님)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsKind {
    Windows,
    Unix,
}

impl OsKind {
    /// 현재 제어 머신의 OS
    pub fn current() -> Self {
        if cfg!(windows) {
            OsKind::Windows
        } else {
            OsKind::Unix
        }
    }
}

/// 로컬 도구 유무
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolAvailability {
    /// OpenSSH 클라이언트 (`ssh`)
    pub ssh: bool,

    /// 비밀번호 헬퍼 (`sshpass`)
    pub sshpass: bool,
}

impl ToolAvailability {
    /// 로컬 PATH에서 도구 감지
    pub fn detect() -> Self {
        let tools = Self {
            ssh: tool_exists("ssh"),
            sshpass: tool_exists("sshpass"),
        };
        debug!("도구 감지: ssh={}, sshpass={}", tools.ssh, tools.sshpass);
        tools
    }
}

/// `which`/`where`로 실행 파일 존재 확인
fn tool_exists(name: &str) -> bool {
    let probe = if cfg!(windows) { "where" } else { "which" };
    Command::new(probe)
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// 시도할 백엔드 후보를 우선순위 순서로 반환
///
/// - Windows: russh → OpenSSH 클라이언트 → 파이프 폴백
/// - Unix: 비밀번호 + sshpass 있으면 sshpass 우선, 그 다음 russh → 파이프 폴백
///
/// 의존 도구가 없는 후보는 원격 명령을 시도하기 전에 목록에서 빠진다.
pub fn select_backends(
    os: OsKind,
    password_supplied: bool,
    tools: &ToolAvailability,
) -> Vec<BackendKind> {
    let mut candidates = Vec::new();

    match os {
        OsKind::Windows => {
            candidates.push(BackendKind::ClientLibrary);
            if tools.ssh {
                candidates.push(BackendKind::OpenSsh);
            }
        }
        OsKind::Unix => {
            if password_supplied && tools.sshpass {
                candidates.push(BackendKind::Sshpass);
            }
            candidates.push(BackendKind::ClientLibrary);
        }
    }

    // 파이프 폴백은 항상 마지막 후보
    candidates.push(BackendKind::RawPipe);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_order() {
        let tools = ToolAvailability {
            ssh: true,
            sshpass: false,
        };
        let backends = select_backends(OsKind::Windows, false, &tools);
        assert_eq!(
            backends,
            vec![
                BackendKind::ClientLibrary,
                BackendKind::OpenSsh,
                BackendKind::RawPipe
            ]
        );
    }

    #[test]
    fn test_windows_without_openssh_falls_through() {
        // ssh 없으면 OpenSSH 후보가 원격 명령 시도 없이 빠짐
        let tools = ToolAvailability {
            ssh: false,
            sshpass: false,
        };
        let backends = select_backends(OsKind::Windows, false, &tools);
        assert_eq!(
            backends,
            vec![BackendKind::ClientLibrary, BackendKind::RawPipe]
        );
    }

    #[test]
    fn test_unix_with_password_and_sshpass() {
        let tools = ToolAvailability {
            ssh: true,
            sshpass: true,
        };
        let backends = select_backends(OsKind::Unix, true, &tools);
        assert_eq!(
            backends,
            vec![
                BackendKind::Sshpass,
                BackendKind::ClientLibrary,
                BackendKind::RawPipe
            ]
        );
    }

    #[test]
    fn test_unix_password_without_sshpass() {
        let tools = ToolAvailability {
            ssh: true,
            sshpass: false,
        };
        let backends = select_backends(OsKind::Unix, true, &tools);
        assert_eq!(
            backends,
            vec![BackendKind::ClientLibrary, BackendKind::RawPipe]
        );
    }

    #[test]
    fn test_unix_no_password_ignores_sshpass() {
        // 비밀번호 없으면 sshpass가 있어도 쓰지 않음
        let tools = ToolAvailability {
            ssh: true,
            sshpass: true,
        };
        let backends = select_backends(OsKind::Unix, false, &tools);
        assert_eq!(
            backends,
            vec![BackendKind::ClientLibrary, BackendKind::RawPipe]
        );
    }

    #[test]
    fn test_raw_pipe_is_always_last_resort() {
        let tools = ToolAvailability::default();
        for os in [OsKind::Windows, OsKind::Unix] {
            for password in [false, true] {
                let backends = select_backends(os, password, &tools);
                assert_eq!(backends.last(), Some(&BackendKind::RawPipe));
            }
        }
    }
}
