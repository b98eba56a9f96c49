use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backend_domain::ports::EventRepository;
use backend_domain::{DbConfig, Event, LocationCode, NewEvent};

const EVENTS_TABLE: &str = "events";

/// Flat storage shape of an event. Identifiers and timestamps are kept as
/// text so the offset written by the normalizer survives a round trip.
#[derive(Debug, Clone, Row, Serialize, Deserialize)]
struct EventRow {
    event_id: String,
    trans_id: String,
    trans_tms: String,
    rc_num: String,
    client_id: String,
    event_cnt: i32,
    location_cd: String,
    location_id1: Option<String>,
    location_id2: Option<String>,
    addr_nbr: Option<String>,
}

impl EventRow {
    fn from_event(event: &Event) -> Self {
        Self {
            event_id: event.event_id.to_string(),
            trans_id: event.trans_id.to_string(),
            trans_tms: event.trans_tms.to_rfc3339_opts(SecondsFormat::Millis, false),
            rc_num: event.rc_num.clone(),
            client_id: event.client_id.clone(),
            event_cnt: event.event_cnt,
            location_cd: event.location_cd.as_str().to_string(),
            location_id1: event.location_id1.clone(),
            location_id2: event.location_id2.clone(),
            addr_nbr: event.addr_nbr.clone(),
        }
    }

    fn into_event(self) -> Result<Event> {
        Ok(Event {
            event_id: Uuid::parse_str(&self.event_id)?,
            trans_id: Uuid::parse_str(&self.trans_id)?,
            trans_tms: DateTime::parse_from_rfc3339(&self.trans_tms)?,
            rc_num: self.rc_num,
            client_id: self.client_id,
            event_cnt: self.event_cnt,
            location_cd: self
                .location_cd
                .parse::<LocationCode>()
                .map_err(|err| anyhow!("stored location_cd: {}", err))?,
            location_id1: self.location_id1,
            location_id2: self.location_id2,
            addr_nbr: self.addr_nbr,
        })
    }
}

#[derive(Clone)]
pub struct ClickhouseEventRepository {
    client: Client,
    database: String,
}

impl ClickhouseEventRepository {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn from_config(config: &DbConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.clickhouse_url)
            .with_database(&config.clickhouse_database);
        if let Some(user) = &config.clickhouse_user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.clickhouse_password {
            client = client.with_password(password);
        }
        Self::new(client, config.clickhouse_database.clone())
    }

    /// Client for `ALTER ... UPDATE/DELETE`; waits until the mutation is applied
    /// so the following read sees it.
    fn mutation_client(&self) -> Client {
        self.client.clone().with_option("mutations_sync", "1")
    }

    async fn fetch_row(&self, event_id: Uuid) -> Result<Option<EventRow>> {
        let query = format!("SELECT ?fields FROM {} WHERE event_id = ? LIMIT 1", EVENTS_TABLE);
        let row = self
            .client
            .query(&query)
            .bind(event_id.to_string())
            .fetch_optional::<EventRow>()
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl EventRepository for ClickhouseEventRepository {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client
            .clone()
            .with_database("default")
            .query(&create_db)
            .execute()
            .await?;

        let create_events = format!(
            r#"
CREATE TABLE IF NOT EXISTS {} (
    event_id String,
    trans_id String,
    trans_tms String,
    rc_num String,
    client_id String,
    event_cnt Int32,
    location_cd String,
    location_id1 Nullable(String),
    location_id2 Nullable(String),
    addr_nbr Nullable(String),
    created_at DateTime64(3) DEFAULT now64(3)
) ENGINE = MergeTree
ORDER BY event_id
"#,
            EVENTS_TABLE
        );
        self.client.query(&create_events).execute().await?;
        Ok(())
    }

    async fn create(&self, event: NewEvent) -> Result<Event> {
        let event = event.into_event(Uuid::new_v4());
        let mut insert = self.client.insert(EVENTS_TABLE)?;
        insert.write(&EventRow::from_event(&event)).await?;
        insert.end().await?;
        Ok(event)
    }

    async fn get_all(&self) -> Result<Vec<Event>> {
        let query = format!("SELECT ?fields FROM {} ORDER BY created_at, event_id", EVENTS_TABLE);
        let rows = self.client.query(&query).fetch_all::<EventRow>().await?;
        rows.into_iter().map(EventRow::into_event).collect()
    }

    async fn get_by_id(&self, event_id: Uuid) -> Result<Option<Event>> {
        self.fetch_row(event_id)
            .await?
            .map(EventRow::into_event)
            .transpose()
    }

    async fn update(&self, event_id: Uuid, event: NewEvent) -> Result<Option<Event>> {
        if self.fetch_row(event_id).await?.is_none() {
            return Ok(None);
        }
        let row = EventRow::from_event(&event.into_event(event_id));
        let query = format!(
            "ALTER TABLE {} UPDATE trans_id = ?, trans_tms = ?, rc_num = ?, client_id = ?, \
             event_cnt = ?, location_cd = ?, location_id1 = ?, location_id2 = ?, addr_nbr = ? \
             WHERE event_id = ?",
            EVENTS_TABLE
        );
        self.mutation_client()
            .query(&query)
            .bind(&row.trans_id)
            .bind(&row.trans_tms)
            .bind(&row.rc_num)
            .bind(&row.client_id)
            .bind(row.event_cnt)
            .bind(&row.location_cd)
            .bind(&row.location_id1)
            .bind(&row.location_id2)
            .bind(&row.addr_nbr)
            .bind(&row.event_id)
            .execute()
            .await?;
        row.into_event().map(Some)
    }

    async fn delete(&self, event_id: Uuid) -> Result<Option<Event>> {
        let Some(row) = self.fetch_row(event_id).await? else {
            return Ok(None);
        };
        let query = format!("ALTER TABLE {} DELETE WHERE event_id = ?", EVENTS_TABLE);
        self.mutation_client()
            .query(&query)
            .bind(event_id.to_string())
            .execute()
            .await?;
        row.into_event().map(Some)
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}
