//! # OSP (Octal Shell Push)
//!
//! scp/sftp 없이 SSH 셸만으로 파일을 올리는 폴백 전송 도구
//!
//! ## 핵심 특징
//! - **셸 기반 전송**: `printf "\NNN..." >> 파일` 명령으로 바이너리 전송
//! - **8진수 이스케이프**: 모든 바이트를 3자리 8진수로 변환 (NUL 포함 안전)
//! - **백엔드 자동 선택**: OS와 로컬 도구 감지로 전송 전략 결정
//!   (russh 라이브러리 → sshpass → OpenSSH 클라이언트 → 파이프 폴백)
//! - **크기 검증**: 전송 후 `wc -c`로 로컬/원격 바이트 수 비교
//! - **순차 전송**: 청크 단위 직렬 전송, 파이프라이닝 없음

pub mod backend;
pub mod chunk;
pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod pipe;
pub mod progress;
pub mod request;
pub mod transfer;
pub mod verify;

pub use backend::{BackendKind, OsKind, ToolAvailability};
pub use chunk::ChunkPlanner;
pub use config::Config;
pub use error::{Error, Result};
pub use progress::{Progress, SilentProgress, TracingProgress};
pub use request::{TransferOutcome, TransferRequest};
pub use transfer::Transfer;
pub use verify::Verdict;

/// 기본 청크 크기 (바이트) - russh/sshpass/파이프 백엔드
pub const DEFAULT_CHUNK_SIZE: usize = 800;

/// 대화형 OpenSSH 백엔드용 청크 크기 (바이트)
/// 이스케이프 후 4배로 늘어나므로 명령줄 길이 제한을 고려해 작게 잡음
pub const INTERACTIVE_CHUNK_SIZE: usize = 500;

/// 기본 SSH 포트
pub const DEFAULT_SSH_PORT: u16 = 22;
