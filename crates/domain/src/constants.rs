//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// API client defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// Cache configuration
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const CACHE_SWEEP_INTERVAL_SECS: u64 = 60;

// Reconnection policy for the push channel
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const RECONNECT_BASE_DELAY_MS: u64 = 1000;
pub const RECONNECT_MAX_DELAY_MS: u64 = 30_000;

// Session storage keys
pub const PUSH_AVAILABILITY_KEY: &str = "ws_notifications_available";
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

// API paths (relative to the configured base URL)
pub const APPOINTMENTS_PATH: &str = "/v1/appointments/";
pub const AVAILABILITY_CHECK_PATH: &str = "/v1/appointments/check-availability/";
pub const PATIENTS_PATH: &str = "/v1/users/patients/";
pub const PROFESSIONALS_PATH: &str = "/v1/professionals/";
pub const DASHBOARD_STATS_PATH: &str = "/v1/dashboard/stats/";
pub const UPCOMING_APPOINTMENTS_PATH: &str = "/v1/dashboard/upcoming-appointments/";
pub const TOKEN_PATH: &str = "/v1/users/token/";
pub const TOKEN_REFRESH_PATH: &str = "/v1/users/token/refresh/";
pub const CURRENT_USER_PATH: &str = "/v1/users/me/";
pub const PUSH_ENDPOINT_PATH: &str = "/ws/notifications/";

// User-facing copy (the product ships in Spanish)
pub const FETCH_ERROR_FALLBACK: &str = "Error al cargar los datos";
pub const CONNECTED_MESSAGE: &str = "Conectado al servidor en tiempo real";
