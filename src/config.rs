//! 전송 설정

use crate::backend::BackendKind;
use crate::{DEFAULT_CHUNK_SIZE, INTERACTIVE_CHUNK_SIZE};

/// OSP 전송 설정
///
/// 청크 크기와 지연 값은 원격 셸의 명령줄 길이 제한과 입력 버퍼를
/// 넘치지 않도록 경험적으로 정한 상수들이다.
#[derive(Debug, Clone)]
pub struct Config {
    /// 기본 청크 크기 (바이트)
    pub chunk_size: usize,

    /// 대화형 OpenSSH 백엔드용 청크 크기 (바이트)
    pub interactive_chunk_size: usize,

    /// 연결 타임아웃 (밀리초)
    pub connect_timeout_ms: u64,

    /// 파이프 백엔드 연결 후 안정화 대기 (밀리초)
    pub settle_delay_ms: u64,

    /// sshpass 백엔드 안정화 대기 (밀리초)
    pub sshpass_settle_delay_ms: u64,

    /// truncate 명령 후 대기 (밀리초)
    pub truncate_delay_ms: u64,

    /// 청크 간 전송 간격 (밀리초)
    pub chunk_delay_ms: u64,

    /// 대화형 OpenSSH 백엔드 청크 간격 (밀리초)
    pub interactive_chunk_delay_ms: u64,

    /// 파이프 종료 대기 타임아웃 (밀리초)
    pub exit_timeout_ms: u64,

    /// sshpass 종료 대기 타임아웃 (밀리초)
    pub sshpass_exit_timeout_ms: u64,

    /// 크기 검증 응답 대기 타임아웃 (밀리초)
    pub verify_timeout_ms: u64,

    /// 진행률 출력 간격 (청크 수)
    pub progress_interval: usize,

    /// 대화형 백엔드 진행률 출력 간격 (청크 수)
    pub interactive_progress_interval: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            interactive_chunk_size: INTERACTIVE_CHUNK_SIZE,
            connect_timeout_ms: 30_000,
            settle_delay_ms: 3000,
            sshpass_settle_delay_ms: 2000,
            truncate_delay_ms: 500,
            chunk_delay_ms: 10,
            interactive_chunk_delay_ms: 50,
            exit_timeout_ms: 30_000,
            sshpass_exit_timeout_ms: 10_000,
            verify_timeout_ms: 5000,
            progress_interval: 100,
            interactive_progress_interval: 50,
        }
    }
}

impl Config {
    /// 새 설정 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 불안정한 링크용 설정
    ///
    /// 작은 청크 + 긴 간격으로 원격 셸 입력 버퍼 오버런을 피한다
    pub fn conservative() -> Self {
        Self {
            chunk_size: 500,
            interactive_chunk_size: 300,
            connect_timeout_ms: 60_000,
            settle_delay_ms: 5000,
            sshpass_settle_delay_ms: 4000,
            truncate_delay_ms: 1000,
            chunk_delay_ms: 50,
            interactive_chunk_delay_ms: 100,
            exit_timeout_ms: 60_000,
            sshpass_exit_timeout_ms: 30_000,
            verify_timeout_ms: 10_000,
            progress_interval: 50,
            interactive_progress_interval: 25,
        }
    }

    /// 백엔드별 청크 크기
    pub fn chunk_size_for(&self, kind: BackendKind) -> usize {
        match kind {
            BackendKind::OpenSsh => self.interactive_chunk_size,
            _ => self.chunk_size,
        }
    }

    /// 백엔드별 안정화 대기 (밀리초)
    pub fn settle_delay_for(&self, kind: BackendKind) -> u64 {
        match kind {
            BackendKind::Sshpass => self.sshpass_settle_delay_ms,
            _ => self.settle_delay_ms,
        }
    }

    /// 백엔드별 청크 간격 (밀리초)
    pub fn chunk_delay_for(&self, kind: BackendKind) -> u64 {
        match kind {
            BackendKind::OpenSsh => self.interactive_chunk_delay_ms,
            _ => self.chunk_delay_ms,
        }
    }

    /// 백엔드별 종료 대기 타임아웃 (밀리초)
    pub fn exit_timeout_for(&self, kind: BackendKind) -> u64 {
        match kind {
            BackendKind::Sshpass => self.sshpass_exit_timeout_ms,
            _ => self.exit_timeout_ms,
        }
    }

    /// 백엔드별 진행률 출력 간격
    pub fn progress_interval_for(&self, kind: BackendKind) -> usize {
        match kind {
            BackendKind::OpenSsh => self.interactive_progress_interval,
            _ => self.progress_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_specific_values() {
        let config = Config::default();

        assert_eq!(config.chunk_size_for(BackendKind::ClientLibrary), 800);
        assert_eq!(config.chunk_size_for(BackendKind::Sshpass), 800);
        assert_eq!(config.chunk_size_for(BackendKind::RawPipe), 800);
        assert_eq!(config.chunk_size_for(BackendKind::OpenSsh), 500);

        assert_eq!(config.settle_delay_for(BackendKind::Sshpass), 2000);
        assert_eq!(config.settle_delay_for(BackendKind::RawPipe), 3000);
        assert_eq!(config.exit_timeout_for(BackendKind::Sshpass), 10_000);
        assert_eq!(config.exit_timeout_for(BackendKind::OpenSsh), 30_000);
    }
}
