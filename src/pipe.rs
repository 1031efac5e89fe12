//! 대화형 파이프 드라이버
//!
//! 원격 셸 프로세스 하나를 띄워 stdin에 명령을 텍스트 줄로 흘려 넣는다.
//! sshpass / OpenSSH / 최후 수단 파이프 백엔드가 모두 이 드라이버를
//! argv와 지연 설정만 바꿔 공유한다.
//!
//! 연결 직후 고정 안정화 대기, 청크마다 작은 간격을 둬서 원격 셸의
//! 입력 버퍼 오버런을 피한다 (고정 간격, 적응형 아님).

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::backend::BackendKind;
use crate::chunk::ChunkPlanner;
use crate::command;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::request::TransferRequest;
use crate::verify;

/// 파이프 드라이버 설정 (백엔드별 상수 묶음)
#[derive(Debug, Clone)]
pub struct PipeSettings {
    pub chunk_size: usize,
    pub settle_delay_ms: u64,
    pub truncate_delay_ms: u64,
    pub chunk_delay_ms: u64,
    pub exit_timeout_ms: u64,
    pub verify_timeout_ms: u64,
}

impl PipeSettings {
    /// 설정에서 백엔드별 값 추출
    pub fn for_backend(config: &Config, kind: BackendKind) -> Self {
        Self {
            chunk_size: config.chunk_size_for(kind),
            settle_delay_ms: config.settle_delay_for(kind),
            truncate_delay_ms: config.truncate_delay_ms,
            chunk_delay_ms: config.chunk_delay_for(kind),
            exit_timeout_ms: config.exit_timeout_for(kind),
            verify_timeout_ms: config.verify_timeout_ms,
        }
    }
}

/// OpenSSH 클라이언트 argv (키 인증 전제)
pub fn ssh_argv(req: &TransferRequest) -> Vec<String> {
    vec![
        "ssh".to_string(),
        "-p".to_string(),
        req.port.to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        req.destination(),
    ]
}

/// sshpass 래퍼 argv (비밀번호 인증)
pub fn sshpass_argv(req: &TransferRequest, password: &str) -> Vec<String> {
    let mut argv = vec![
        "sshpass".to_string(),
        "-p".to_string(),
        password.to_string(),
    ];
    argv.extend(ssh_argv(req));
    argv
}

/// 파이프 전송 실행
///
/// 연결 → truncate → 청크 스트리밍 → 크기 질의 → exit → 종료 대기 순서.
/// 종료 대기가 타임아웃되면 프로세스를 강제 종료한다.
/// 반환값은 원격이 보고한 크기 (응답을 못 읽으면 None).
pub async fn run(
    argv: &[String],
    data: &[u8],
    remote_path: &str,
    settings: &PipeSettings,
    progress: &dyn Progress,
) -> Result<Option<u64>> {
    let mut child = Command::new(&argv[0])
        .args(&argv[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ToolUnavailable {
                    tool: argv[0].clone(),
                }
            } else {
                Error::Io(e)
            }
        })?;

    let mut stdin = child.stdin.take().ok_or(Error::PipeClosed)?;
    let stdout = child.stdout.take().ok_or(Error::PipeClosed)?;

    // 연결 안정화 대기
    debug!("파이프 연결 대기: {}ms", settings.settle_delay_ms);
    sleep(Duration::from_millis(settings.settle_delay_ms)).await;

    // 원격 파일 truncate
    write_line(&mut stdin, &command::truncate_command(remote_path)).await?;
    sleep(Duration::from_millis(settings.truncate_delay_ms)).await;

    // 청크 스트리밍 (직렬, 고정 간격)
    let planner = ChunkPlanner::new(settings.chunk_size);
    let total_chunks = planner.total_chunks(data.len());
    info!("분할 전송 시작: 총 {} 청크", total_chunks);

    for (index, chunk) in planner.chunks(data).enumerate() {
        if let Some(cmd) = command::append_command(chunk, remote_path) {
            write_line(&mut stdin, &cmd).await?;
        }

        progress.on_chunk(index + 1, total_chunks);

        if settings.chunk_delay_ms > 0 {
            sleep(Duration::from_millis(settings.chunk_delay_ms)).await;
        }
    }

    // 크기 검증 질의 - 응답은 자식 stdout으로 온다
    write_line(&mut stdin, &command::size_command(remote_path)).await?;
    let remote_size = read_size_response(stdout, settings.verify_timeout_ms).await;

    // 세션 종료
    write_line(&mut stdin, command::EXIT_COMMAND).await?;
    drop(stdin);

    match timeout(
        Duration::from_millis(settings.exit_timeout_ms),
        child.wait(),
    )
    .await
    {
        Ok(status) => {
            let status = status?;
            if !status.success() {
                warn!("원격 셸 종료 코드: {}", status);
            }
            Ok(remote_size)
        }
        Err(_) => {
            warn!("종료 대기 타임아웃, 프로세스 강제 종료");
            child.kill().await.ok();
            Err(Error::Timeout("파이프 종료 대기".to_string()))
        }
    }
}

/// 명령 한 줄 기록 + flush
///
/// 파이프가 끊긴 경우 (원격 연결/인증 실패로 자식이 죽은 경우)는
/// PipeClosed로 구분한다
async fn write_line(stdin: &mut tokio::process::ChildStdin, line: &str) -> Result<()> {
    let mut buf = Vec::with_capacity(line.len() + 1);
    buf.extend_from_slice(line.as_bytes());
    buf.push(b'\n');

    let write = async {
        stdin.write_all(&buf).await?;
        stdin.flush().await
    };

    write.await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::BrokenPipe {
            Error::PipeClosed
        } else {
            Error::Io(e)
        }
    })
}

/// 자식 stdout에서 크기 응답 읽기
///
/// MOTD 등 잡음 줄을 건너뛰고 숫자로 파싱되는 첫 줄을 취한다.
/// 기한 내에 못 읽으면 None (검증 허용 정책으로 넘어감)
async fn read_size_response(
    stdout: tokio::process::ChildStdout,
    timeout_ms: u64,
) -> Option<u64> {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    let mut lines = BufReader::new(stdout).lines();

    loop {
        let remaining = deadline.checked_duration_since(Instant::now())?;
        match timeout(remaining, lines.next_line()).await {
            Ok(Ok(Some(line))) => {
                if let Some(size) = verify::parse_remote_size(&line) {
                    return Some(size);
                }
                debug!("크기 응답 아님, 건너뜀: '{}'", line.trim());
            }
            Ok(Ok(None)) | Ok(Err(_)) | Err(_) => return None,
        }
    }
}
