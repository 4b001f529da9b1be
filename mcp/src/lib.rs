// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod bridge;
pub mod sse;
pub mod stdio;

#[cfg(test)]
mod testutil;

pub use bridge::Bridge;
pub use sse::{router, serve_sse};
pub use stdio::{serve_io, serve_stdio};
