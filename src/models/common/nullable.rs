use serde::{Deserialize, Deserializer};

/// 区分“字段缺省”和“显式 null”
///
/// 搭配 `Option<Option<T>>` 与 `#[serde(default)]` 使用：
/// 缺省 => `None`，`null` => `Some(None)`，有值 => `Some(Some(v))`。
pub fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
