//! Serde 辅助：SurrealDB 空值与 RecordId 的两种来源格式
//!
//! RecordId 既可能以 "table:id" 字符串出现 (API JSON)，也可能以
//! SurrealDB 原生结构出现 (数据库行)，这里统一吞掉两种格式。

use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// Deserialize a bool field, treating null/absent as true
///
/// is_active 列在早期数据里可能缺失，缺失视为在职。
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

/// Deserialize a bool field, treating null/absent as false
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// 同时接受字符串和原生格式的 RecordId
#[derive(Debug, Clone)]
struct FlexibleRecordId(RecordId);

impl<'de> Deserialize<'de> for FlexibleRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct FlexibleVisitor;

        impl<'de> Visitor<'de> for FlexibleVisitor {
            type Value = FlexibleRecordId;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a 'table:id' string or a native RecordId")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(FlexibleRecordId)
                    .map_err(|_| de::Error::custom(format!("invalid record id: {value}")))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(FlexibleRecordId)
            }
        }

        deserializer.deserialize_any(FlexibleVisitor)
    }
}

/// `#[serde(with)]` module: RecordId as a "table:id" string
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(FlexibleRecordId::deserialize(d)?.0)
    }
}

/// `#[serde(with)]` module: Option<RecordId> as an optional string
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<FlexibleRecordId>::deserialize(d)?.map(|f| f.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn default_true() -> bool {
        true
    }

    #[derive(Deserialize)]
    struct Row {
        #[serde(with = "record_id")]
        user: RecordId,
        #[serde(default = "default_true", deserialize_with = "bool_true")]
        is_active: bool,
    }

    #[test]
    fn record_id_accepts_string_form() {
        let row: Row = serde_json::from_str(r#"{"user": "profile:abc"}"#).unwrap();
        assert_eq!(row.user.to_string(), "profile:abc");
        assert!(row.is_active);
    }

    #[test]
    fn null_bool_defaults() {
        let row: Row =
            serde_json::from_str(r#"{"user": "profile:abc", "is_active": null}"#).unwrap();
        assert!(row.is_active);
    }
}
