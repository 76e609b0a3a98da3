// User account API library
// 역할: main.rs 와 통합 테스트가 함께 사용하는 모듈 트리
pub mod docs;
pub mod domains;
pub mod routes;
pub mod shared;
