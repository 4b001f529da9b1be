// Авторские права (c) 2025 urdekcah. Все права защищены.
//
// Этот исходный код распространяется под лицензией AGPL-3.0,
// текст которой находится в файле LICENSE в корневом каталоге данного проекта.
pub mod server;

pub use server::WeatherServer;

pub const SERVER_NAME: &str = "weather-server";
pub const SERVER_VERSION: &str = "1.0.0";
