//! 전송 요청/결과 정의

use std::path::PathBuf;

use crate::backend::BackendKind;

/// 전송 요청 (불변 입력)
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// SSH 서버 주소
    pub host: String,

    /// SSH 포트
    pub port: u16,

    /// 사용자명
    pub username: String,

    /// 비밀번호 (선택, 없으면 키 인증)
    pub password: Option<String>,

    /// 로컬 파일 경로
    pub local_path: PathBuf,

    /// 원격 파일 경로
    pub remote_path: String,
}

impl TransferRequest {
    /// 새 전송 요청 생성
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: Option<String>,
        local_path: impl Into<PathBuf>,
        remote_path: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password,
            local_path: local_path.into(),
            remote_path: remote_path.into(),
        }
    }

    /// `user@host` 형태의 SSH 대상 문자열
    pub fn destination(&self) -> String {
        format!("{}@{}", self.username, self.host)
    }
}

/// 전송 결과
///
/// 성공 여부와 비교한 바이트 수를 담는다. 모든 에러는 최상위 전송 호출에서
/// 흡수되어 이 구조체로 변환된다.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// 전송 성공 여부
    pub success: bool,

    /// 실제 전송에 사용된 백엔드
    pub backend: Option<BackendKind>,

    /// 로컬 파일 크기 (바이트)
    pub local_size: u64,

    /// 원격이 보고한 크기 (응답 파싱 실패 시 None)
    pub remote_size: Option<u64>,
}

impl TransferOutcome {
    /// 실패 결과 생성
    pub fn failed(local_size: u64) -> Self {
        Self {
            success: false,
            backend: None,
            local_size,
            remote_size: None,
        }
    }
}
