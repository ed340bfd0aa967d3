/// SQLite schema DDL, executed once at open time via
/// `Connection::execute_batch`. Every statement uses `IF NOT EXISTS` so
/// startup is idempotent.
///
/// SQLite, not DuckDB, backs the store: both the Scraper and the Notifier
/// are independent OS processes that open their own connection against the
/// same on-disk file, and DuckDB does not support that (a second process
/// opening a file the first still holds fails outright). SQLite's file
/// locking plus WAL mode (set in `backend::open`) is built for exactly this
/// — one writer, many readers, across processes — which is why it is the
/// store's actual engine despite the `DuckDbBackend` name the teacher's
/// code used.
///
/// `scan_history.city` stores either an upper-cased city name or the
/// sentinel `query_url_{id}` for query-URL scans — both share the same
/// `UNIQUE(source, city)` cadence-gating key.
///
/// `user_preferences.cities`/`classes` are JSON-encoded TEXT columns
/// (SQLite has no array type); `enqueue_matches` reaches them through the
/// bundled JSON1 extension's `json_each`/`json_array_length`.
pub const INIT_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS properties (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    source              TEXT NOT NULL,
    source_id           TEXT NOT NULL,
    property_hash       TEXT NOT NULL UNIQUE,
    url                 TEXT NOT NULL,
    title               TEXT,
    address             TEXT NOT NULL,
    postal_code         TEXT,
    city                TEXT NOT NULL,
    neighborhood        TEXT,
    price               TEXT,
    price_numeric       INTEGER NOT NULL CHECK (price_numeric > 0),
    price_period        TEXT,
    service_costs        REAL,
    description         TEXT,
    property_type       TEXT,
    offering_type       TEXT NOT NULL DEFAULT 'rental',
    living_area         INTEGER,
    plot_area           INTEGER,
    volume              INTEGER,
    rooms               INTEGER,
    bedrooms            INTEGER,
    bathrooms           INTEGER,
    floors              INTEGER,
    balcony             INTEGER NOT NULL DEFAULT 0,
    garden              INTEGER NOT NULL DEFAULT 0,
    parking             INTEGER NOT NULL DEFAULT 0,
    construction_year   INTEGER,
    energy_label        TEXT,
    interior            TEXT,
    lat                 REAL,
    lon                 REAL,
    date_listed         TEXT,
    date_available      TEXT,
    first_scraped       TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    date_scraped        TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    images              TEXT,
    features            TEXT,
    UNIQUE(source, source_id)
);
CREATE INDEX IF NOT EXISTS idx_properties_city ON properties(city);
CREATE INDEX IF NOT EXISTS idx_properties_hash ON properties(property_hash);

CREATE TABLE IF NOT EXISTS scan_history (
    source          TEXT NOT NULL,
    city            TEXT NOT NULL,
    url             TEXT,
    scanned_at      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    duration_ms     INTEGER NOT NULL DEFAULT 0,
    new_count       INTEGER NOT NULL DEFAULT 0,
    total_count     INTEGER NOT NULL DEFAULT 0,
    UNIQUE(source, city)
);

CREATE TABLE IF NOT EXISTS query_urls (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    source          TEXT NOT NULL,
    queryurl        TEXT NOT NULL,
    method          TEXT NOT NULL DEFAULT 'GET',
    enabled         INTEGER NOT NULL DEFAULT 1,
    last_scan_time  TEXT,
    description     TEXT,
    UNIQUE(source, queryurl)
);

CREATE TABLE IF NOT EXISTS duplicate_properties (
    source_1        TEXT NOT NULL,
    source_id_1     TEXT NOT NULL,
    source_2        TEXT NOT NULL,
    source_id_2     TEXT NOT NULL,
    content_hash    TEXT NOT NULL,
    similarity_score REAL NOT NULL,
    detected_at     TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(source_1, source_id_1, source_2, source_id_2)
);

CREATE TABLE IF NOT EXISTS telegram_users (
    user_id                 INTEGER PRIMARY KEY,
    display_name            TEXT,
    active                  INTEGER NOT NULL DEFAULT 1,
    admin                   INTEGER NOT NULL DEFAULT 0,
    notifications_enabled   INTEGER NOT NULL DEFAULT 1,
    last_active             TEXT,
    created_at              TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS user_preferences (
    user_id         INTEGER PRIMARY KEY,
    cities          TEXT NOT NULL DEFAULT '[]',
    min_price       INTEGER NOT NULL DEFAULT 0,
    max_price       INTEGER NOT NULL DEFAULT 0,
    min_rooms       INTEGER NOT NULL DEFAULT 0,
    max_rooms       INTEGER NOT NULL DEFAULT 0,
    min_area        INTEGER NOT NULL DEFAULT 0,
    max_area        INTEGER NOT NULL DEFAULT 0,
    neighborhood    TEXT,
    classes         TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS notification_queue (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         INTEGER NOT NULL,
    listing_id      INTEGER NOT NULL,
    status          TEXT NOT NULL DEFAULT 'pending',
    attempts        INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    last_attempt_at TEXT,
    UNIQUE(user_id, listing_id)
);
CREATE INDEX IF NOT EXISTS idx_queue_status ON notification_queue(status, created_at);

CREATE TABLE IF NOT EXISTS notification_history (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         INTEGER NOT NULL,
    listing_id      INTEGER NOT NULL,
    reaction_tag    TEXT,
    sent_at         TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_history_user_sent ON notification_history(user_id, sent_at);
"#;
