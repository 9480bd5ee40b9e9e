//! Data source name parsing.
//!
//! Accepts the MySQL driver DSN grammar
//!
//! ```text
//! [user[:password]@][net[(addr)]]/dbname[?param1=value1&...&paramN=valueN]
//! ```
//!
//! and turns it into a `mysql://` URL the ORM understands. Strings that are
//! already URLs pass through untouched.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use common::constants::{DEFAULT_MYSQL_HOST, DEFAULT_MYSQL_PORT};
use common::{AppError, AppResult};

/// The password may contain `@`, so it is matched greedily and the last `@`
/// in front of the network part wins.
static DSN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?P<user>[^:@/]*)(?::(?P<password>.*))?@)?(?:(?P<net>[A-Za-z0-9_]+)(?:\((?P<addr>[^)]*)\))?)?/(?P<dbname>[^/?]*)(?:\?(?P<params>.*))?$",
    )
    .expect("DSN pattern is a valid regex")
});

static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("scheme pattern is a valid regex"));

static DURATION_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)(ns|us|µs|ms|s|m|h)").expect("duration pattern is a valid regex")
});

/// Params forwarded to the driver URL. Everything else is ignored.
const FORWARDED_PARAMS: &[&str] = &["charset", "collation"];

/// Parsed MySQL data source name.
#[derive(Clone, PartialEq, Eq)]
pub struct DataSourceName {
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    /// Query params in declaration order
    pub params: Vec<(String, String)>,
    /// Connect timeout taken from the `timeout` param
    pub timeout: Option<Duration>,
}

impl FromStr for DataSourceName {
    type Err = AppError;

    fn from_str(raw: &str) -> AppResult<Self> {
        let caps = DSN_PATTERN
            .captures(raw)
            .ok_or_else(|| AppError::config("Malformed data source name: missing '/dbname'"))?;

        let user = caps.name("user").map(|m| m.as_str().to_string());
        let password = caps
            .name("password")
            .map(|m| m.as_str().to_string())
            .filter(|p| !p.is_empty());

        if let Some(net) = caps.name("net") {
            if net.as_str() != "tcp" {
                return Err(AppError::config(format!(
                    "Unsupported network '{}' in data source name (only 'tcp' is supported)",
                    net.as_str()
                )));
            }
        }

        let (host, port) = split_addr(caps.name("addr").map_or("", |m| m.as_str()))?;
        let database = caps
            .name("dbname")
            .map_or_else(String::new, |m| m.as_str().to_string());

        let params: Vec<(String, String)> = caps
            .name("params")
            .map(|m| {
                url::form_urlencoded::parse(m.as_str().as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        let mut timeout = None;
        for (key, value) in &params {
            match key.as_str() {
                "timeout" => timeout = Some(parse_go_duration(value)?),
                k if FORWARDED_PARAMS.contains(&k) => {}
                other => tracing::debug!(param = other, "Ignoring data source name parameter"),
            }
        }

        Ok(Self {
            user,
            password,
            host,
            port,
            database,
            params,
            timeout,
        })
    }
}

impl DataSourceName {
    /// Build the `mysql://` connection URL.
    pub fn to_url(&self) -> AppResult<String> {
        let mut url = Url::parse("mysql://localhost")
            .map_err(|e| AppError::internal(format!("Base URL rejected: {}", e)))?;

        url.set_host(Some(&self.host))
            .map_err(|e| AppError::config(format!("Invalid host '{}': {}", self.host, e)))?;
        url.set_port(Some(self.port))
            .map_err(|_| AppError::config(format!("Invalid port {}", self.port)))?;

        if let Some(user) = &self.user {
            url.set_username(user)
                .map_err(|_| AppError::config("Invalid user in data source name"))?;
        }
        if let Some(password) = &self.password {
            url.set_password(Some(password))
                .map_err(|_| AppError::config("Invalid password in data source name"))?;
        }

        url.set_path(&format!("/{}", self.database));

        let forwarded: Vec<&(String, String)> = self
            .params
            .iter()
            .filter(|(k, _)| FORWARDED_PARAMS.contains(&k.as_str()))
            .collect();
        if !forwarded.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in forwarded {
                query.append_pair(key, value);
            }
        }

        Ok(url.into())
    }
}

// Never print the password
impl fmt::Display for DataSourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.user, &self.password) {
            (Some(user), Some(_)) => write!(f, "{}:***@", user)?,
            (Some(user), None) => write!(f, "{}@", user)?,
            (None, _) => {}
        }
        write!(f, "tcp({}:{})/{}", self.host, self.port, self.database)
    }
}

impl fmt::Debug for DataSourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceName")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("params", &self.params)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Where to connect, as understood by the ORM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub url: String,
    /// Overrides the configured connect timeout when set
    pub connect_timeout: Option<Duration>,
}

/// Resolve a configured DSN or URL into a connection target.
pub fn resolve_database_url(raw: &str) -> AppResult<ConnectionTarget> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::config("Data source name is empty"));
    }

    if URL_SCHEME.is_match(raw) || raw.starts_with("sqlite:") {
        return Ok(ConnectionTarget {
            url: raw.to_string(),
            connect_timeout: None,
        });
    }

    let dsn: DataSourceName = raw.parse()?;
    Ok(ConnectionTarget {
        url: dsn.to_url()?,
        connect_timeout: dsn.timeout,
    })
}

/// Hide the password of a connection URL for logging.
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("***")).is_ok() {
                url.into()
            } else {
                "[REDACTED]".to_string()
            }
        }
        Ok(_) => raw.to_string(),
        Err(_) => "[REDACTED]".to_string(),
    }
}

fn split_addr(addr: &str) -> AppResult<(String, u16)> {
    if addr.is_empty() {
        return Ok((DEFAULT_MYSQL_HOST.to_string(), DEFAULT_MYSQL_PORT));
    }

    let (host, port) = if let Some(rest) = addr.strip_prefix('[') {
        // Bracketed IPv6 literal
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| AppError::config(format!("Unterminated IPv6 address '{}'", addr)))?;
        let port = match tail {
            "" => None,
            t => Some(t.strip_prefix(':').ok_or_else(|| {
                AppError::config(format!("Unexpected characters after IPv6 address '{}'", addr))
            })?),
        };
        (format!("[{}]", host), port)
    } else {
        match addr.rsplit_once(':') {
            Some((host, port)) => (host.to_string(), Some(port)),
            None => (addr.to_string(), None),
        }
    };

    let port = match port {
        Some(p) => p
            .parse::<u16>()
            .map_err(|_| AppError::config(format!("Invalid port '{}' in address '{}'", p, addr)))?,
        None => DEFAULT_MYSQL_PORT,
    };

    let host = if host.is_empty() {
        DEFAULT_MYSQL_HOST.to_string()
    } else {
        host
    };

    Ok((host, port))
}

/// Parse a duration written the way the MySQL driver expects (`5s`, `1m30s`, `250ms`).
fn parse_go_duration(raw: &str) -> AppResult<Duration> {
    let invalid = || AppError::config(format!("Invalid timeout '{}'", raw));

    let mut consumed = 0;
    let mut seconds = 0f64;
    for caps in DURATION_PART.captures_iter(raw) {
        let whole = caps.get(0).ok_or_else(invalid)?;
        if whole.start() != consumed {
            return Err(invalid());
        }
        consumed = whole.end();

        let value: f64 = caps[1].parse().map_err(|_| invalid())?;
        let scale = match &caps[2] {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return Err(invalid()),
        };
        seconds += value * scale;
    }

    if consumed == 0 || consumed != raw.len() {
        return Err(invalid());
    }

    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}
