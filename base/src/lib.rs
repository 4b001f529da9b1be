// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod context;
pub mod dotenv;
pub mod logging;

pub use context::Context;
pub use logging::Logger;
