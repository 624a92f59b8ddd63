//! Neo4j client for the farm graph

use super::models::*;
use crate::profile::leveling;
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, SecondsFormat, Utc};
use neo4rs::{query, Graph, Query, Row, Txn};
use std::sync::Arc;

/// Client for Neo4j operations
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically
pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .with_context(|| format!("Invalid timestamp '{}'", raw))
}

/// Execute a query inside a transaction and drain every row
async fn collect_rows(txn: &mut Txn, q: Query) -> Result<Vec<Row>> {
    let mut stream = txn.execute(q).await?;
    let mut rows = Vec::new();
    while let Some(row) = stream.next(txn.handle()).await? {
        rows.push(row);
    }
    Ok(rows)
}

/// Commit on success, roll back on failure
async fn finish<T>(txn: Txn, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            txn.commit().await.context("Failed to commit transaction")?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::warn!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        let client = Self {
            graph: Arc::new(graph),
        };

        // Initialize schema
        client.init_schema().await?;

        Ok(client)
    }

    /// Initialize the graph schema with constraints and indexes
    async fn init_schema(&self) -> Result<()> {
        let constraints = vec![
            "CREATE CONSTRAINT user_username IF NOT EXISTS FOR (u:User) REQUIRE u.username IS UNIQUE",
            "CREATE CONSTRAINT farm_id IF NOT EXISTS FOR (f:Farm) REQUIRE f.id IS UNIQUE",
            "CREATE CONSTRAINT profile_pic_id IF NOT EXISTS FOR (p:ProfilePic) REQUIRE p.id IS UNIQUE",
            "CREATE CONSTRAINT notification_id IF NOT EXISTS FOR (n:Notification) REQUIRE n.id IS UNIQUE",
            "CREATE CONSTRAINT reading_id IF NOT EXISTS FOR (r:Reading) REQUIRE r.id IS UNIQUE",
        ];

        let indexes = vec![
            "CREATE INDEX notification_user IF NOT EXISTS FOR (n:Notification) ON (n.userId)",
            "CREATE INDEX sensor_id IF NOT EXISTS FOR (s:Sensor) ON (s.sensorId)",
        ];

        for constraint in constraints {
            if let Err(e) = self.graph.run(query(constraint)).await {
                tracing::warn!("Constraint may already exist: {}", e);
            }
        }

        for index in indexes {
            if let Err(e) = self.graph.run(query(index)).await {
                tracing::warn!("Index may already exist: {}", e);
            }
        }

        Ok(())
    }

    /// Execute a parameterized read query and collect all rows
    async fn read_rows(&self, q: Query) -> Result<Vec<Row>> {
        let mut result = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a parameterized write query in its own transaction
    async fn write_rows(&self, q: Query) -> Result<Vec<Row>> {
        let mut txn = self.graph.start_txn().await?;
        let outcome = collect_rows(&mut txn, q).await;
        finish(txn, outcome).await
    }

    pub async fn health_check(&self) -> Result<bool> {
        let rows = self.read_rows(query("RETURN 1 AS ok")).await?;
        Ok(!rows.is_empty())
    }

    // ========================================================================
    // User operations
    // ========================================================================

    /// Get a user by username
    pub async fn get_user(&self, username: &str) -> Result<Option<UserNode>> {
        let q = query(
            r#"
            MATCH (u:User {username: $username})
            RETURN u
            "#,
        )
        .param("username", username);

        match self.read_rows(q).await?.first() {
            Some(row) => {
                let node: neo4rs::Node = row.get("u")?;
                Ok(Some(self.node_to_user(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Apply one leveling round under the user's write lock
    pub async fn record_round(
        &self,
        username: &str,
        accuracy: f64,
    ) -> Result<Option<LevelUpResult>> {
        let mut txn = self.graph.start_txn().await?;
        let outcome = Self::record_round_in(&mut txn, username, accuracy).await;
        finish(txn, outcome).await
    }

    async fn record_round_in(
        txn: &mut Txn,
        username: &str,
        accuracy: f64,
    ) -> Result<Option<LevelUpResult>> {
        // Writing a property first takes the node lock, serializing concurrent rounds
        let read = query(
            r#"
            MATCH (u:User {username: $username})
            SET u._lock = true
            REMOVE u._lock
            RETURN coalesce(u.level, 1) AS level, coalesce(u.experience, 0) AS experience
            "#,
        )
        .param("username", username);

        let rows = collect_rows(txn, read).await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let level: i64 = row.get("level")?;
        let experience: i64 = row.get("experience")?;

        let result = leveling::apply_round(
            u32::try_from(level).context("Stored level out of range")?,
            u64::try_from(experience).context("Stored experience out of range")?,
            accuracy,
        );

        let write = query(
            r#"
            MATCH (u:User {username: $username})
            SET u.level = $level, u.experience = $experience
            "#,
        )
        .param("username", username)
        .param("level", i64::from(result.new_level))
        .param("experience", result.remaining_experience as i64);
        txn.run(write).await?;

        Ok(Some(result))
    }

    fn node_to_user(&self, node: &neo4rs::Node) -> Result<UserNode> {
        Ok(UserNode {
            username: node.get("username")?,
            level: node
                .get::<i64>("level")
                .ok()
                .and_then(|l| u32::try_from(l).ok())
                .unwrap_or(1),
            experience: node
                .get::<i64>("experience")
                .ok()
                .and_then(|e| u64::try_from(e).ok())
                .unwrap_or(0),
            created_at: node
                .get::<String>("createdAt")
                .ok()
                .and_then(|s| s.parse().ok()),
        })
    }

    // ========================================================================
    // Farm operations
    // ========================================================================

    /// Create a farm, merging the owning user if absent
    pub async fn create_farm(&self, farm: &FarmNode) -> Result<()> {
        let q = query(
            r#"
            MERGE (u:User {username: $username})
            ON CREATE SET u.level = 1, u.experience = 0, u.createdAt = $createdAt
            CREATE (f:Farm {
                id: $id,
                farmName: $farmName,
                cropType: $cropType,
                description: $description,
                owner: $username,
                createdAt: $createdAt,
                updatedAt: $updatedAt,
                lat: $lat,
                lng: $lng,
                image: $image
            })
            CREATE (u)-[:OWNS]->(f)
            "#,
        )
        .param("username", farm.owner.clone())
        .param("id", farm.id.clone())
        .param("farmName", farm.farm_name.clone())
        .param("cropType", farm.crop_type.clone())
        .param("description", farm.description.clone())
        .param("createdAt", format_timestamp(&farm.created_at))
        .param("updatedAt", format_timestamp(&farm.updated_at))
        .param("lat", farm.location.map(|l| l.lat))
        .param("lng", farm.location.map(|l| l.lng))
        .param("image", farm.image.clone());

        self.write_rows(q).await?;
        Ok(())
    }

    /// List farms owned by a user
    pub async fn list_farms(&self, owner: &str) -> Result<Vec<FarmNode>> {
        let q = query(
            r#"
            MATCH (u:User {username: $username})-[:OWNS]->(f:Farm)
            RETURN f
            ORDER BY f.updatedAt DESC
            "#,
        )
        .param("username", owner);

        let rows = self.read_rows(q).await?;
        let mut farms = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("f")?;
            farms.push(self.node_to_farm(&node)?);
        }
        Ok(farms)
    }

    /// Get a farm by id, scoped to the owner
    pub async fn get_farm(&self, owner: &str, id: &str) -> Result<Option<FarmNode>> {
        let q = query(
            r#"
            MATCH (u:User {username: $username})-[:OWNS]->(f:Farm {id: $id})
            RETURN f
            "#,
        )
        .param("username", owner)
        .param("id", id);

        match self.read_rows(q).await?.first() {
            Some(row) => {
                let node: neo4rs::Node = row.get("f")?;
                Ok(Some(self.node_to_farm(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Update the mutable farm fields, scoped to the owner
    pub async fn update_farm(
        &self,
        owner: &str,
        id: &str,
        changes: &FarmChanges,
    ) -> Result<Option<FarmNode>> {
        let q = query(
            r#"
            MATCH (u:User {username: $username})-[:OWNS]->(f:Farm {id: $id})
            SET f.farmName = $farmName,
                f.cropType = $cropType,
                f.description = $description,
                f.updatedAt = $updatedAt
            RETURN f
            "#,
        )
        .param("username", owner)
        .param("id", id)
        .param("farmName", changes.farm_name.clone())
        .param("cropType", changes.crop_type.clone())
        .param("description", changes.description.clone())
        .param("updatedAt", format_timestamp(&changes.updated_at));

        match self.write_rows(q).await?.first() {
            Some(row) => {
                let node: neo4rs::Node = row.get("f")?;
                Ok(Some(self.node_to_farm(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Delete a farm and everything hanging off its sensors
    pub async fn delete_farm(&self, owner: &str, id: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (u:User {username: $username})-[:OWNS]->(f:Farm {id: $id})
            OPTIONAL MATCH (f)-[:HAS_SENSOR]->(s:Sensor)
            OPTIONAL MATCH (s)-[:HAS_READING]->(r:Reading)
            OPTIONAL MATCH (r)-[:INTERPRETED_AS]->(i:Interpretation)
            WITH f, f.id AS deleted,
                 collect(DISTINCT s) AS sensors,
                 collect(DISTINCT r) AS readings,
                 collect(DISTINCT i) AS interpretations
            FOREACH (n IN interpretations + readings + sensors | DETACH DELETE n)
            DETACH DELETE f
            RETURN deleted
            "#,
        )
        .param("username", owner)
        .param("id", id);

        Ok(!self.write_rows(q).await?.is_empty())
    }

    fn node_to_farm(&self, node: &neo4rs::Node) -> Result<FarmNode> {
        let lat = node.get::<f64>("lat").ok();
        let lng = node.get::<f64>("lng").ok();

        Ok(FarmNode {
            id: node.get("id")?,
            farm_name: node.get("farmName")?,
            crop_type: node.get("cropType")?,
            description: node.get("description").ok(),
            owner: node.get("owner")?,
            created_at: parse_timestamp(&node.get::<String>("createdAt")?)?,
            updated_at: parse_timestamp(&node.get::<String>("updatedAt")?)?,
            location: match (lat, lng) {
                (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
                _ => None,
            },
            image: node.get("image").ok(),
        })
    }

    // ========================================================================
    // Profile picture operations
    // ========================================================================

    /// Replace the user's profile picture (delete-then-create, one transaction)
    pub async fn replace_profile_pic(&self, username: &str, pic: &ProfilePicNode) -> Result<()> {
        let mut txn = self.graph.start_txn().await?;
        let outcome = Self::replace_profile_pic_in(&mut txn, username, pic).await;
        finish(txn, outcome).await
    }

    async fn replace_profile_pic_in(
        txn: &mut Txn,
        username: &str,
        pic: &ProfilePicNode,
    ) -> Result<()> {
        let remove = query(
            r#"
            MATCH (u:User {username: $username})-[:HAS_PROFILE_PIC]->(p:ProfilePic)
            DETACH DELETE p
            "#,
        )
        .param("username", username);
        txn.run(remove).await?;

        let create = query(
            r#"
            MERGE (u:User {username: $username})
            ON CREATE SET u.level = 1, u.experience = 0, u.createdAt = $uploadedAt
            CREATE (p:ProfilePic {
                id: $id,
                image: $image,
                uploadedAt: $uploadedAt,
                fileFormat: $fileFormat,
                fileSize: $fileSize
            })
            CREATE (u)-[:HAS_PROFILE_PIC]->(p)
            "#,
        )
        .param("username", username)
        .param("id", pic.id.clone())
        .param("image", BASE64.encode(&pic.image))
        .param("uploadedAt", format_timestamp(&pic.uploaded_at))
        .param("fileFormat", pic.file_format.clone())
        .param("fileSize", pic.file_size as i64);
        txn.run(create).await?;

        Ok(())
    }

    /// Get the user's current profile picture
    pub async fn get_profile_pic(&self, username: &str) -> Result<Option<ProfilePicNode>> {
        let q = query(
            r#"
            MATCH (u:User {username: $username})-[:HAS_PROFILE_PIC]->(p:ProfilePic)
            RETURN p
            "#,
        )
        .param("username", username);

        match self.read_rows(q).await?.first() {
            Some(row) => {
                let node: neo4rs::Node = row.get("p")?;
                Ok(Some(self.node_to_profile_pic(&node)?))
            }
            None => Ok(None),
        }
    }

    fn node_to_profile_pic(&self, node: &neo4rs::Node) -> Result<ProfilePicNode> {
        let encoded: String = node.get("image")?;
        Ok(ProfilePicNode {
            id: node.get("id")?,
            image: BASE64
                .decode(encoded.as_bytes())
                .context("Stored profile picture is not valid base64")?,
            uploaded_at: parse_timestamp(&node.get::<String>("uploadedAt")?)?,
            file_format: node.get("fileFormat")?,
            file_size: node.get::<i64>("fileSize")?.max(0) as u64,
        })
    }

    // ========================================================================
    // Notification operations
    // ========================================================================

    /// Persist a new notification
    pub async fn create_notification(&self, notification: &NotificationNode) -> Result<()> {
        let q = query(
            r#"
            CREATE (n:Notification {
                id: $id,
                userId: $userId,
                type: $type,
                title: $title,
                message: $message,
                read: $read,
                timestamp: $timestamp,
                metadata: $metadata
            })
            "#,
        )
        .param("id", notification.id.clone())
        .param("userId", notification.user_id.clone())
        .param("type", notification.notification_type.as_str())
        .param("title", notification.title.clone())
        .param("message", notification.message.clone())
        .param("read", notification.read)
        .param("timestamp", format_timestamp(&notification.timestamp))
        .param("metadata", serde_json::to_string(&notification.metadata)?);

        self.write_rows(q).await?;
        Ok(())
    }

    /// List unread notifications for a user, newest first
    pub async fn list_unread_notifications(&self, user_id: &str) -> Result<Vec<NotificationNode>> {
        let q = query(
            r#"
            MATCH (n:Notification {userId: $userId, read: false})
            RETURN n
            ORDER BY n.timestamp DESC
            "#,
        )
        .param("userId", user_id);

        let rows = self.read_rows(q).await?;
        let mut notifications = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("n")?;
            notifications.push(self.node_to_notification(&node)?);
        }
        Ok(notifications)
    }

    /// Get a notification by id
    pub async fn get_notification(&self, id: &str) -> Result<Option<NotificationNode>> {
        let q = query(
            r#"
            MATCH (n:Notification {id: $id})
            RETURN n
            "#,
        )
        .param("id", id);

        match self.read_rows(q).await?.first() {
            Some(row) => {
                let node: neo4rs::Node = row.get("n")?;
                Ok(Some(self.node_to_notification(&node)?))
            }
            None => Ok(None),
        }
    }

    /// Flip the read flag; idempotent
    pub async fn mark_notification_read(&self, id: &str) -> Result<bool> {
        let q = query(
            r#"
            MATCH (n:Notification {id: $id})
            SET n.read = true
            RETURN n.id AS id
            "#,
        )
        .param("id", id);

        Ok(!self.write_rows(q).await?.is_empty())
    }

    fn node_to_notification(&self, node: &neo4rs::Node) -> Result<NotificationNode> {
        let metadata = node
            .get::<String>("metadata")
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_else(|| serde_json::json!({}));

        Ok(NotificationNode {
            id: node.get("id")?,
            user_id: node.get("userId")?,
            notification_type: node.get::<String>("type")?.parse()?,
            title: node.get("title")?,
            message: node.get("message")?,
            read: node.get("read").unwrap_or(false),
            timestamp: parse_timestamp(&node.get::<String>("timestamp")?)?,
            metadata,
        })
    }

    // ========================================================================
    // Soil analysis operations
    // ========================================================================

    /// Attach a reading and its interpretation to a sensor of an owned farm
    pub async fn save_sensor_reading(
        &self,
        owner: &str,
        farm_id: &str,
        sensor_id: &str,
        reading: &ReadingNode,
        interpretation: &str,
    ) -> Result<bool> {
        let q = query(
            r#"
            MATCH (u:User {username: $username})-[:OWNS]->(f:Farm {id: $farmId})
            MERGE (f)-[:HAS_SENSOR]->(s:Sensor {sensorId: $sensorId})
            CREATE (r:Reading {
                id: $id,
                fertility: $fertility,
                moisture: $moisture,
                ph: $ph,
                temperature: $temperature,
                sunlight: $sunlight,
                humidity: $humidity,
                cropType: $cropType,
                username: $username,
                createdAt: $createdAt,
                submittedAt: $submittedAt
            })
            CREATE (i:Interpretation {value: $interpretation})
            CREATE (s)-[:HAS_READING]->(r)
            CREATE (r)-[:INTERPRETED_AS]->(i)
            RETURN r.id AS id
            "#,
        )
        .param("username", owner)
        .param("farmId", farm_id)
        .param("sensorId", sensor_id)
        .param("id", reading.id.clone())
        .param("fertility", reading.fertility)
        .param("moisture", reading.moisture)
        .param("ph", reading.ph)
        .param("temperature", reading.temperature)
        .param("sunlight", reading.sunlight)
        .param("humidity", reading.humidity)
        .param("cropType", reading.crop_type.clone())
        .param("createdAt", format_timestamp(&reading.created_at))
        .param("submittedAt", format_timestamp(&reading.submitted_at))
        .param("interpretation", interpretation);

        Ok(!self.write_rows(q).await?.is_empty())
    }

    /// List readings of an owned farm, newest first
    pub async fn list_sensor_readings(
        &self,
        owner: &str,
        farm_id: &str,
    ) -> Result<Vec<SensorReadingRecord>> {
        let q = query(
            r#"
            MATCH (u:User {username: $username})-[:OWNS]->(f:Farm {id: $farmId})-[:HAS_SENSOR]->(s:Sensor)
            MATCH (s)-[:HAS_READING]->(r:Reading)
            OPTIONAL MATCH (r)-[:INTERPRETED_AS]->(i:Interpretation)
            RETURN f.farmName AS farmName, s.sensorId AS sensorId, r, i.value AS interpretation
            ORDER BY r.createdAt DESC
            "#,
        )
        .param("username", owner)
        .param("farmId", farm_id);

        let rows = self.read_rows(q).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let node: neo4rs::Node = row.get("r")?;
            records.push(SensorReadingRecord {
                farm_name: row.get("farmName")?,
                sensor_id: row.get("sensorId")?,
                reading: self.node_to_reading(&node)?,
                interpretation: row.get::<Option<String>>("interpretation").ok().flatten(),
            });
        }
        Ok(records)
    }

    fn node_to_reading(&self, node: &neo4rs::Node) -> Result<ReadingNode> {
        Ok(ReadingNode {
            id: node.get("id")?,
            fertility: node.get("fertility")?,
            moisture: node.get("moisture")?,
            ph: node.get("ph")?,
            temperature: node.get("temperature")?,
            sunlight: node.get("sunlight")?,
            humidity: node.get("humidity")?,
            crop_type: node.get("cropType")?,
            username: node.get("username")?,
            created_at: parse_timestamp(&node.get::<String>("createdAt")?)?,
            submitted_at: parse_timestamp(&node.get::<String>("submittedAt")?)?,
        })
    }
}
