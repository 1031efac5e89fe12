//! 청크 분할 정의
//!
//! 파일 버퍼를 백엔드별 고정 크기 청크로 순서대로 자른다.
//! 겹침/누락 없이 버퍼 전체를 정확히 한 번씩 덮는다.

/// 청크 분할기
#[derive(Debug, Clone)]
pub struct ChunkPlanner {
    chunk_size: usize,
}

impl ChunkPlanner {
    /// 새 분할기 생성
    ///
    /// 크기 0은 의미가 없으므로 최소 1로 보정한다
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// 청크 크기
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// 총 청크 수 (올림 나눗셈)
    pub fn total_chunks(&self, data_len: usize) -> usize {
        (data_len + self.chunk_size - 1) / self.chunk_size
    }

    /// 버퍼를 순서대로 청크로 자르는 이터레이터
    pub fn chunks<'a>(&self, data: &'a [u8]) -> impl Iterator<Item = &'a [u8]> {
        data.chunks(self.chunk_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_count_and_sizes() {
        // 2048바이트 / 800 -> [800, 800, 448]
        let planner = ChunkPlanner::new(800);
        let data = vec![0u8; 2048];

        assert_eq!(planner.total_chunks(data.len()), 3);

        let sizes: Vec<usize> = planner.chunks(&data).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![800, 800, 448]);
    }

    #[test]
    fn test_chunks_cover_buffer_exactly_once() {
        let planner = ChunkPlanner::new(7);
        let data: Vec<u8> = (0..100u8).collect();

        let mut reassembled = Vec::new();
        for chunk in planner.chunks(&data) {
            reassembled.extend_from_slice(chunk);
        }

        assert_eq!(reassembled, data);
        assert_eq!(planner.chunks(&data).count(), planner.total_chunks(data.len()));
    }

    #[test]
    fn test_exact_multiple() {
        let planner = ChunkPlanner::new(500);
        assert_eq!(planner.total_chunks(1000), 2);
        assert_eq!(planner.total_chunks(1), 1);
    }

    #[test]
    fn test_empty_buffer() {
        let planner = ChunkPlanner::new(800);
        assert_eq!(planner.total_chunks(0), 0);
        assert_eq!(planner.chunks(&[]).count(), 0);
    }

    #[test]
    fn test_zero_chunk_size_clamped() {
        let planner = ChunkPlanner::new(0);
        assert_eq!(planner.chunk_size(), 1);
    }
}
