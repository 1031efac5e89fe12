//! 전송 오케스트레이션
//!
//! 로컬 파일을 읽고, 백엔드 후보를 정하고, 순서대로 시도한다.
//! 모든 실패는 여기서 흡수되어 TransferOutcome으로 변환된다 -
//! 에러가 최상위 호출 밖으로 전파되지 않는다.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{error, info, warn};

use crate::backend::{self, BackendKind, OsKind, ToolAvailability};
use crate::config::Config;
use crate::error::Error;
use crate::pipe::{self, PipeSettings};
use crate::progress::{Progress, TracingProgress};
use crate::request::{TransferOutcome, TransferRequest};
use crate::verify::{self, Verdict};
use crate::{client, Result};

/// 파일 전송 실행기
pub struct Transfer {
    config: Config,
    progress: Option<Arc<dyn Progress>>,
}

impl Transfer {
    /// 기본 설정으로 생성
    pub fn new(config: Config) -> Self {
        Self {
            config,
            progress: None,
        }
    }

    /// 진행률 옵저버 교체 (기본: tracing 출력)
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// 전송 실행
    ///
    /// 로컬 파일 확인 → 버퍼 읽기 → OS/도구 감지 → 백엔드 순서대로 시도.
    /// 도구가 없는 백엔드만 다음 후보로 넘어가고, 그 외 실패는 최종 결과가 된다.
    pub async fn run(&self, req: &TransferRequest) -> TransferOutcome {
        // 전제 조건: 로컬 파일 존재. 실패면 아무 전송도 시도하지 않는다
        let data = match read_local(req).await {
            Ok(data) => data,
            Err(e) => {
                error!("전제 조건 실패: {}", e);
                return TransferOutcome::failed(0);
            }
        };
        let local_size = data.len() as u64;

        let os = OsKind::current();
        info!("전송 시작: {} 바이트, OS: {:?}", local_size, os);

        let tools = ToolAvailability::detect();
        let candidates = backend::select_backends(os, req.password.is_some(), &tools);

        for kind in candidates {
            info!("백엔드 시도: {}", kind);

            match self.try_backend(kind, req, &data).await {
                Ok(remote_size) => {
                    return self.conclude(kind, local_size, remote_size);
                }
                Err(Error::ToolUnavailable { tool }) => {
                    // 도구 부재만 다음 후보로 폴스루
                    warn!("{} 백엔드 사용 불가 (도구 없음: {}), 다음 시도", kind, tool);
                    continue;
                }
                Err(e) => {
                    error!("{} 백엔드 전송 실패: {}", kind, e);
                    self.log_failure_hints();
                    return TransferOutcome {
                        success: false,
                        backend: Some(kind),
                        local_size,
                        remote_size: None,
                    };
                }
            }
        }

        error!("시도할 백엔드 없음");
        self.log_failure_hints();
        TransferOutcome::failed(local_size)
    }

    /// 백엔드 하나 실행, 원격 보고 크기 반환
    async fn try_backend(
        &self,
        kind: BackendKind,
        req: &TransferRequest,
        data: &[u8],
    ) -> Result<Option<u64>> {
        let progress = self.progress_for(kind);

        match kind {
            BackendKind::ClientLibrary => {
                client::run(req, data, &self.config, progress.as_ref()).await
            }
            BackendKind::Sshpass => {
                // 선택기가 비밀번호 있을 때만 후보에 넣는다
                let password = req.password.as_deref().ok_or(Error::AuthFailed(
                    "sshpass 백엔드에 비밀번호 없음".to_string(),
                ))?;
                let argv = pipe::sshpass_argv(req, password);
                let settings = PipeSettings::for_backend(&self.config, kind);
                pipe::run(&argv, data, &req.remote_path, &settings, progress.as_ref()).await
            }
            BackendKind::OpenSsh => {
                if req.password.is_some() {
                    // OpenSSH 클라이언트는 비밀번호를 대화형으로만 받으므로
                    // 여기서는 키 인증만 지원 (원본 동작 유지)
                    return Err(Error::AuthFailed(
                        "OpenSSH 백엔드는 비밀번호 인증 미지원".to_string(),
                    ));
                }
                let argv = pipe::ssh_argv(req);
                let settings = PipeSettings::for_backend(&self.config, kind);
                pipe::run(&argv, data, &req.remote_path, &settings, progress.as_ref()).await
            }
            BackendKind::RawPipe => {
                let argv = pipe::ssh_argv(req);
                let settings = PipeSettings::for_backend(&self.config, kind);
                pipe::run(&argv, data, &req.remote_path, &settings, progress.as_ref()).await
            }
        }
    }

    /// 크기 비교로 최종 결과 판정
    fn conclude(
        &self,
        kind: BackendKind,
        local_size: u64,
        remote_size: Option<u64>,
    ) -> TransferOutcome {
        let verdict = match remote_size {
            Some(remote) => verify::check(local_size, &remote.to_string()),
            None => Verdict::Unparsable,
        };

        match verdict {
            Verdict::Match { size } => {
                info!(
                    "파일 전송 성공! 로컬: {} 바이트, 원격: {} 바이트",
                    local_size, size
                );
            }
            Verdict::Mismatch { local, remote } => {
                error!("크기 불일치! 로컬: {} 바이트, 원격: {} 바이트", local, remote);
                self.log_failure_hints();
            }
            Verdict::Unparsable => {
                warn!("원격 크기 확인 불가, 전송 성공으로 간주");
            }
        }

        TransferOutcome {
            success: verdict.accepted(),
            backend: Some(kind),
            local_size,
            remote_size: verdict.remote_size().or(remote_size),
        }
    }

    /// 백엔드별 진행률 옵저버
    fn progress_for(&self, kind: BackendKind) -> Arc<dyn Progress> {
        match &self.progress {
            Some(progress) => progress.clone(),
            None => Arc::new(TracingProgress::new(
                self.config.progress_interval_for(kind),
            )),
        }
    }

    /// 전체 실패 시 사용자 힌트
    fn log_failure_hints(&self) {
        warn!("제안:");
        warn!("1. SSH 서버 연결 상태 확인");
        warn!("2. 사용자명/비밀번호 또는 키 파일 확인");
        warn!("3. 비밀번호 인증이 필요하면 sshpass 설치");
    }
}

impl Default for Transfer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// 로컬 파일을 한 번에 버퍼로 읽기
async fn read_local(req: &TransferRequest) -> Result<Bytes> {
    if !req.local_path.exists() {
        return Err(Error::LocalFileMissing {
            path: req.local_path.display().to_string(),
        });
    }
    Ok(Bytes::from(tokio::fs::read(&req.local_path).await?))
}
