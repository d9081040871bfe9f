//! 프로세스 종료 코드 규약
//!
//! 러너 프로세스와 슈퍼바이저가 같은 상수를 사용해야 분류가 어긋나지 않습니다.

/// 모든 시나리오가 선언된 결과와 일치
pub const SUCCESS: i32 = 0;

/// 일반 명령 에러
pub const GENERAL: i32 = 1;

/// 설정 에러
pub const CONFIG: i32 = 2;

/// 시나리오 밖으로 전파된 논리 에러
pub const LOGIC_ERROR: i32 = 3;

/// 하네스 자체 검증 실패 (선언/관측 불일치, 훅 폴트)
pub const HARNESS_FAILURE: i32 = 4;

/// `halt` 정책으로 실행이 조기 중단됨
pub const HALTED: i32 = 5;

/// I/O 에러
pub const IO: i32 = 10;
