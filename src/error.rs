//! 에러 타입 정의

use thiserror::Error;

/// OSP 전송 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO 에러: {0}")]
    Io(#[from] std::io::Error),

    #[error("SSH 에러: {0}")]
    Ssh(#[from] russh::Error),

    #[error("로컬 파일 없음: {path}")]
    LocalFileMissing { path: String },

    #[error("도구 없음: {tool}")]
    ToolUnavailable { tool: String },

    #[error("연결 실패: {0}")]
    ConnectFailed(String),

    #[error("인증 실패: {0}")]
    AuthFailed(String),

    #[error("청크 명령 실패: chunk={index}, stderr={stderr}")]
    ChunkCommandFailed { index: usize, stderr: String },

    #[error("파이프 닫힘")]
    PipeClosed,

    #[error("타임아웃: {0}")]
    Timeout(String),

    #[error("원격 명령이 종료 코드를 반환하지 않음")]
    CommandDidntExit,
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, Error>;
