use num_bigint::BigUint;
use serde::{Serialize, Deserialize, Deserializer, Serializer, de::{self, Visitor}, ser::SerializeStruct};
use crate::{Ciphertext, PublicKey};

// Big integers travel as decimal strings so that every format, including
// JSON with its float-backed numbers, carries them exactly.
struct Decimal(BigUint);

impl Serialize for Decimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
    {
        serializer.serialize_str(&self.0.to_str_radix(10))
    }
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = BigUint;
    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a non-negative decimal integer string")
    }
    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where E: de::Error,
    {
        BigUint::parse_bytes(v.as_bytes(), 10)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de>
    {
        deserializer.deserialize_str(DecimalVisitor).map(Decimal)
    }
}

/// `#[serde(with = ...)]` adapter for a sequence of big integers.
pub(crate) mod decimal_seq {
    use super::*;

    pub fn serialize<S>(values: &[BigUint], serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
    {
        serializer.collect_seq(values.iter().map(|v| Decimal(v.clone())))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<BigUint>, D::Error>
    where D: Deserializer<'de>
    {
        let values = Vec::<Decimal>::deserialize(deserializer)?;
        Ok(values.into_iter().map(|d| d.0).collect())
    }
}

impl Serialize for Ciphertext {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
    {
        serializer.serialize_str(&self.value().to_str_radix(10))
    }
}

impl<'de> Deserialize<'de> for Ciphertext {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de>
    {
        let value = deserializer.deserialize_str(DecimalVisitor)?;
        Ok(Ciphertext::new(value))
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
    {
        let mut s = serializer.serialize_struct("PublicKey", 2)?;
        s.serialize_field("n", &Decimal(self.n().clone()))?;
        s.serialize_field("g", &Decimal(self.g().clone()))?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de>
    {
        struct PublicKeyVisitor;
        impl<'de> Visitor<'de> for PublicKeyVisitor {
            type Value = PublicKey;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("struct PublicKey")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where A: de::SeqAccess<'de>,
            {
                let n = seq.next_element::<Decimal>()?.ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let g = seq.next_element::<Decimal>()?.ok_or_else(|| de::Error::invalid_length(1, &self))?;
                PublicKey::from_members(n.0, g.0).map_err(de::Error::custom)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where A: de::MapAccess<'de>,
            {
                let mut n = None;
                let mut g = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "n" => n = Some(map.next_value::<Decimal>()?.0),
                        "g" => g = Some(map.next_value::<Decimal>()?.0),
                        other => return Err(de::Error::unknown_field(other, &["n", "g"])),
                    }
                }
                let n = n.ok_or_else(|| de::Error::missing_field("n"))?;
                let g = g.ok_or_else(|| de::Error::missing_field("g"))?;
                PublicKey::from_members(n, g).map_err(de::Error::custom)
            }
        }
        deserializer.deserialize_struct("PublicKey", &["n", "g"], PublicKeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use crate::KeyGenerator;

    use super::*;

    #[test]
    fn test_public_key_bincode() {
        let pk = KeyGenerator::from_u64(1000003, 1000033).unwrap().create_public_key();
        let bytes = bincode::serialize(&pk).unwrap();
        let restored: PublicKey = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, pk);
        assert_eq!(restored.n_squared(), pk.n_squared());
    }

    #[test]
    fn test_public_key_json() {
        let pk = KeyGenerator::from_u64(7, 11).unwrap().create_public_key();
        let text = serde_json::to_string(&pk).unwrap();
        assert_eq!(text, r#"{"n":"77","g":"78"}"#);
        let restored: PublicKey = serde_json::from_str(&text).unwrap();
        assert_eq!(restored, pk);
        assert!(serde_json::from_str::<PublicKey>(r#"{"n":"1","g":"2"}"#).is_err());
        assert!(serde_json::from_str::<PublicKey>(r#"{"n":"77"}"#).is_err());
        assert!(serde_json::from_str::<PublicKey>(r#"{"n":"-77","g":"78"}"#).is_err());
    }

    #[test]
    fn test_ciphertext_formats() {
        let huge = BigUint::from(u64::MAX) * BigUint::from(u64::MAX);
        let c = Ciphertext::new(huge.clone());
        let text = serde_json::to_string(&c).unwrap();
        assert_eq!(text, format!("\"{}\"", huge));
        assert_eq!(serde_json::from_str::<Ciphertext>(&text).unwrap(), c);
        let bytes = bincode::serialize(&vec![c.clone(), Ciphertext::new(BigUint::from(4u64))]).unwrap();
        let restored: Vec<Ciphertext> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored[0], c);
        assert!(serde_json::from_str::<Ciphertext>("\"12a\"").is_err());
    }
}
