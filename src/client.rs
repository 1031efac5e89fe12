//! russh 클라이언트 드라이버
//!
//! 인증된 세션 하나를 열고 청크마다 원격 명령 실행을 한 번씩 한다.
//! 각 명령의 종료 코드를 동기적으로 기다린 뒤 다음 청크로 넘어간다
//! (엄격한 직렬화, 파이프라이닝 없음).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use russh::client::{self, Handle, Handler};
use russh::ChannelMsg;
use tokio::time::{sleep, timeout};
use tracing::{debug, info};

use crate::backend::BackendKind;
use crate::chunk::ChunkPlanner;
use crate::command;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::request::TransferRequest;
use crate::verify;

/// 서버 키를 무조건 수락하는 핸들러
///
/// StrictHostKeyChecking=no와 같은 정책. 이 도구는 호스트 키 관리를
/// 범위 밖으로 둔다.
struct AcceptAllHandler;

impl Handler for AcceptAllHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}

/// 원격 명령 실행 결과
struct CommandOutput {
    stdout: String,
    stderr: String,
    exit_status: u32,
}

/// russh 백엔드로 전송 실행
///
/// 반환값은 원격이 보고한 크기 (응답 파싱 실패 시 None)
pub async fn run(
    req: &TransferRequest,
    data: &[u8],
    config: &Config,
    progress: &dyn Progress,
) -> Result<Option<u64>> {
    let handle = connect(req, config).await?;
    info!("SSH 연결 성공: {}", req.destination());

    // 원격 파일 truncate
    execute(&handle, &command::truncate_command(&req.remote_path)).await?;
    sleep(Duration::from_millis(config.truncate_delay_ms)).await;

    // 청크 스트리밍
    let planner = ChunkPlanner::new(config.chunk_size_for(BackendKind::ClientLibrary));
    let total_chunks = planner.total_chunks(data.len());
    info!("분할 전송 시작: 총 {} 청크", total_chunks);

    for (index, chunk) in planner.chunks(data).enumerate() {
        if let Some(cmd) = command::append_command(chunk, &req.remote_path) {
            let output = execute(&handle, &cmd).await?;
            if output.exit_status != 0 {
                // 실패한 청크를 지나치면 원격 내용이 조용히 깨지므로 즉시 중단
                return Err(Error::ChunkCommandFailed {
                    index,
                    stderr: output.stderr,
                });
            }
        }

        progress.on_chunk(index + 1, total_chunks);

        if config.chunk_delay_ms > 0 {
            sleep(Duration::from_millis(config.chunk_delay_ms)).await;
        }
    }

    // 크기 검증 질의
    let output = execute(&handle, &command::size_command(&req.remote_path)).await?;
    let remote_size = verify::parse_remote_size(&output.stdout);

    handle
        .disconnect(russh::Disconnect::ByApplication, "", "")
        .await?;

    Ok(remote_size)
}

/// 연결 + 인증
async fn connect(req: &TransferRequest, config: &Config) -> Result<Handle<AcceptAllHandler>> {
    let ssh_config = Arc::new(client::Config::default());

    let mut handle = timeout(
        Duration::from_millis(config.connect_timeout_ms),
        client::connect(
            ssh_config,
            (req.host.as_str(), req.port),
            AcceptAllHandler,
        ),
    )
    .await
    .map_err(|_| Error::ConnectFailed(format!("{}:{} 연결 타임아웃", req.host, req.port)))??;

    authenticate(&mut handle, req).await?;
    Ok(handle)
}

/// 비밀번호가 있으면 비밀번호 인증, 없으면 기본 키 파일 인증
async fn authenticate(handle: &mut Handle<AcceptAllHandler>, req: &TransferRequest) -> Result<()> {
    if let Some(password) = &req.password {
        let auth = handle
            .authenticate_password(req.username.as_str(), password.as_str())
            .await?;
        if !auth.success() {
            return Err(Error::AuthFailed("비밀번호 인증 거부".to_string()));
        }
        return Ok(());
    }

    for key_path in default_key_candidates() {
        if !key_path.exists() {
            continue;
        }
        debug!("키 파일 시도: {:?}", key_path);

        let key = match russh::keys::load_secret_key(&key_path, None) {
            Ok(key) => key,
            Err(e) => {
                debug!("키 로드 실패 {:?}: {}", key_path, e);
                continue;
            }
        };

        let auth = handle
            .authenticate_publickey(
                req.username.as_str(),
                russh::keys::PrivateKeyWithHashAlg::new(
                    Arc::new(key),
                    handle.best_supported_rsa_hash().await?.flatten(),
                ),
            )
            .await?;
        if auth.success() {
            return Ok(());
        }
    }

    Err(Error::AuthFailed(
        "사용 가능한 키 파일 없음 (비밀번호 미지정)".to_string(),
    ))
}

/// 기본 SSH 키 파일 후보
fn default_key_candidates() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from);

    match home {
        Some(home) => vec![
            home.join(".ssh").join("id_ed25519"),
            home.join(".ssh").join("id_rsa"),
        ],
        None => Vec::new(),
    }
}

/// 원격 명령 하나를 실행하고 종료 코드까지 기다림
async fn execute(handle: &Handle<AcceptAllHandler>, cmd: &str) -> Result<CommandOutput> {
    let mut channel = handle.channel_open_session().await?;
    channel.exec(true, cmd).await?;

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut exit_status = None;

    while let Some(msg) = channel.wait().await {
        match msg {
            ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
            ChannelMsg::ExtendedData { ref data, ext } => {
                // ext 1 = stderr 스트림
                if ext == 1 {
                    stderr.extend_from_slice(data);
                }
            }
            // 종료 코드가 와도 데이터가 더 올 수 있으므로 채널이 닫힐 때까지 읽는다
            ChannelMsg::ExitStatus { exit_status: status } => exit_status = Some(status),
            _ => {}
        }
    }

    let exit_status = exit_status.ok_or(Error::CommandDidntExit)?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&stdout).to_string(),
        stderr: String::from_utf8_lossy(&stderr).to_string(),
        exit_status,
    })
}
