//! OSP 푸시 도구 - Octal Shell Push
//!
//! scp/sftp 없이 SSH 셸만으로 파일을 올리는 폴백 업로더
//! - 백엔드 자동 선택 (russh → sshpass → OpenSSH → 파이프)
//! - 8진수 이스케이프 printf 청크 전송 + wc -c 크기 검증
//!
//! 사용법:
//!   cargo run --release --bin osp-push -- [OPTIONS]
//!
//! 예시:
//!   # 키 인증으로 업로드
//!   cargo run --release --bin osp-push -- -H 203.0.113.10 -u root -l ./qq.png -r /home/1.png
//!
//!   # 비밀번호 인증
//!   cargo run --release --bin osp-push -- -H 203.0.113.10 -u root -P secret -l ./qq.png -r /home/1.png

use std::path::PathBuf;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use osp::{Config, OsKind, Transfer, TransferRequest, DEFAULT_SSH_PORT};

/// CLI 설정
struct CliConfig {
    host: Option<String>,
    port: u16,
    username: Option<String>,
    password: Option<String>,
    local_path: Option<PathBuf>,
    remote_path: Option<String>,
    conservative: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_SSH_PORT,
            username: None,
            password: None,
            local_path: None,
            remote_path: None,
            conservative: false,
        }
    }
}

fn parse_args() -> CliConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-H" => {
                if i + 1 < args.len() {
                    config.host = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    config.port = args[i + 1].parse().expect("유효한 포트 필요");
                    i += 1;
                }
            }
            "--user" | "-u" => {
                if i + 1 < args.len() {
                    config.username = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--password" | "-P" => {
                if i + 1 < args.len() {
                    config.password = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--local" | "-l" => {
                if i + 1 < args.len() {
                    config.local_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--remote" | "-r" => {
                if i + 1 < args.len() {
                    config.remote_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--conservative" => {
                config.conservative = true;
            }
            "--help" | "-h" => {
                println!(
                    r#"OSP Push - Octal Shell Push 업로더

scp/sftp 없이 SSH 셸만으로 파일을 올리는 폴백 전송 도구
- 백엔드 자동 선택: russh 라이브러리 → sshpass → OpenSSH → 파이프 폴백
- printf "\NNN..." 청크 전송 + wc -c 크기 검증

사용법:
  cargo run --release --bin osp-push -- [OPTIONS]

옵션:
  -H, --host <HOST>       SSH 서버 주소 (필수)
  -p, --port <PORT>       SSH 포트 (기본: 22)
  -u, --user <USER>       사용자명 (필수)
  -P, --password <PW>     비밀번호 (생략 시 키 인증)
  -l, --local <PATH>      로컬 파일 경로 (필수)
  -r, --remote <PATH>     원격 파일 경로 (필수)
  --conservative          불안정한 링크용 (작은 청크 + 긴 간격)
  -h, --help              이 도움말 출력

예시:
  # 키 인증 업로드
  cargo run --release --bin osp-push -- -H 192.168.1.100 -u deploy -l app.tar.gz -r /srv/app.tar.gz

  # 비밀번호 인증 + 보수적 설정
  cargo run --release --bin osp-push -- -H 192.168.1.100 -u root -P secret -l qq.png -r /home/1.png --conservative
"#
                );
                std::process::exit(0);
            }
            _ => {}
        }
        i += 1;
    }

    config
}

fn require<T>(value: Option<T>, flag: &str) -> T {
    match value {
        Some(value) => value,
        None => {
            eprintln!("필수 옵션 누락: {} (--help 참고)", flag);
            std::process::exit(2);
        }
    }
}

#[tokio::main]
async fn main() {
    // 로깅 설정
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("로깅 초기화 실패");

    let cli = parse_args();

    let req = TransferRequest::new(
        require(cli.host, "--host"),
        cli.port,
        require(cli.username, "--user"),
        cli.password,
        require(cli.local_path, "--local"),
        require(cli.remote_path, "--remote"),
    );

    info!("OSP Push starting...");
    info!("대상: {}:{}", req.host, req.port);
    info!("제어 머신 OS: {:?}", OsKind::current());

    let config = if cli.conservative {
        Config::conservative()
    } else {
        Config::default()
    };

    let outcome = Transfer::new(config).run(&req).await;

    if outcome.success {
        info!(
            "파일 전송 성공! ({} 바이트, 백엔드: {})",
            outcome.local_size,
            outcome
                .backend
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    } else {
        eprintln!("파일 전송 실패!");
        std::process::exit(1);
    }
}
