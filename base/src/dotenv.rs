use error::Error;
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub(in crate::dotenv) static DEFAULT_FILENAME: &str = ".env";

#[derive(Debug, Default)]
pub struct Dotenv {
  vars: HashMap<String, String>,
}

impl Dotenv {
  pub fn new() -> Self {
    Self {
      vars: HashMap::new(),
    }
  }

  /// Загружает переменные окружения из файла .env
  ///
  /// # Аргументы
  /// * `filename` - Необязательный путь к файлу .env. Если передано None, используется ".env" по умолчанию.
  pub fn load_from_file<P: AsRef<Path>>(&mut self, filename: Option<P>) -> Result<(), Error> {
    let path = filename.map_or_else(
      || PathBuf::from(DEFAULT_FILENAME),
      |p| p.as_ref().to_path_buf(),
    );

    let file = File::open(&path)?;
    let reader = BufReader::new(file);

    for (line_num, line) in reader.lines().enumerate() {
      let line = line?;
      let trimmed = line.trim();

      if trimmed.is_empty() || trimmed.starts_with('#') {
        continue;
      }

      let (key, value) = parse_line(trimmed).map_err(|err| {
        Error::Config(format!(
          "{}: error on line {}: {}",
          path.display(),
          line_num + 1,
          err
        ))
      })?;
      self.vars.insert(key, value);
    }

    Ok(())
  }

  /// Variables already present in the environment are left untouched.
  pub fn set_env_vars(&self) {
    for (key, value) in &self.vars {
      if env::var_os(key).is_none() {
        env::set_var(key, value);
      }
    }
  }

  pub fn get(&self, key: &str) -> Option<&String> {
    self.vars.get(key)
  }
}

fn parse_line(line: &str) -> Result<(String, String), String> {
  let line = line.strip_prefix("export ").unwrap_or(line);
  let (key, value) = line
    .split_once('=')
    .ok_or_else(|| "Invalid format: missing '='".to_string())?;

  let key = key.trim();
  if key.is_empty() {
    return Err("Empty key".to_string());
  }

  let value = value.trim().trim_matches('"').trim_matches('\'').to_string();
  Ok((key.to_string(), value))
}

/// Loads `.env` from the working directory. Returns `false` when there is none.
pub fn load() -> Result<bool, Error> {
  let mut config = Dotenv::new();
  match config.load_from_file::<&str>(None) {
    Ok(()) => {
      config.set_env_vars();
      Ok(true)
    }
    Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
    Err(e) => Err(e),
  }
}
