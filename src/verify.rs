//! 크기 검증
//!
//! 전송 후 원격 `wc -c` 응답을 파싱해 로컬 버퍼 길이와 비교한다.
//! 응답을 숫자로 파싱할 수 없으면 낙관적으로 성공 처리한다
//! (정확성 보장이 아닌 허용 정책, 원본 동작 유지).

use tracing::warn;

/// 검증 판정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// 로컬/원격 크기 일치
    Match { size: u64 },

    /// 크기 불일치
    Mismatch { local: u64, remote: u64 },

    /// 응답 파싱 불가 - 낙관적 성공
    Unparsable,
}

impl Verdict {
    /// 전송 성공으로 간주할지 여부
    pub fn accepted(&self) -> bool {
        !matches!(self, Verdict::Mismatch { .. })
    }

    /// 원격이 보고한 크기
    pub fn remote_size(&self) -> Option<u64> {
        match self {
            Verdict::Match { size } => Some(*size),
            Verdict::Mismatch { remote, .. } => Some(*remote),
            Verdict::Unparsable => None,
        }
    }
}

/// `wc -c` 응답에서 바이트 수 파싱
///
/// 일부 시스템은 앞에 공백을 붙이므로 첫 토큰만 취한다
pub fn parse_remote_size(response: &str) -> Option<u64> {
    response.split_whitespace().next()?.parse().ok()
}

/// 로컬 크기와 원격 응답 비교
pub fn check(local_size: u64, response: &str) -> Verdict {
    match parse_remote_size(response) {
        Some(remote) if remote == local_size => Verdict::Match { size: remote },
        Some(remote) => Verdict::Mismatch {
            local: local_size,
            remote,
        },
        None => {
            warn!(
                "원격 크기 파싱 실패: '{}', 전송 성공으로 간주",
                response.trim()
            );
            Verdict::Unparsable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_size_is_success() {
        let verdict = check(2048, "2048\n");
        assert_eq!(verdict, Verdict::Match { size: 2048 });
        assert!(verdict.accepted());
        assert_eq!(verdict.remote_size(), Some(2048));
    }

    #[test]
    fn test_mismatch_is_failure() {
        let verdict = check(2048, "1600\n");
        assert_eq!(
            verdict,
            Verdict::Mismatch {
                local: 2048,
                remote: 1600
            }
        );
        assert!(!verdict.accepted());
    }

    #[test]
    fn test_unparsable_is_tolerated() {
        // 문서화된 허용 정책: 파싱 불가 -> 성공
        let verdict = check(2048, "garbage output");
        assert_eq!(verdict, Verdict::Unparsable);
        assert!(verdict.accepted());
        assert_eq!(verdict.remote_size(), None);
    }

    #[test]
    fn test_leading_whitespace() {
        // BSD wc는 숫자 앞에 공백을 붙임
        assert_eq!(parse_remote_size("    2048\n"), Some(2048));
    }

    #[test]
    fn test_empty_response() {
        assert_eq!(parse_remote_size(""), None);
        assert!(check(0, "0\n").accepted());
    }
}
