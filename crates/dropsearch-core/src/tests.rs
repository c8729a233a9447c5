//! Unit tests for dropsearch-core

use super::*;

// =============================================================================
// Reference Tests
// =============================================================================

#[cfg(test)]
mod reference_tests {
    use super::*;

    #[test]
    fn test_member_reference_roundtrip() {
        let ids = vec!["dbmid:AAH4f99T0taONIb-OurWxbNQ6ywGRopQngc", "a", "dbmid:ünïcødé"];

        for id in ids {
            let reference = Reference::member(id);
            assert!(reference.is_valid());

            let payload = reference.encode_payload().unwrap();
            let decoded = Reference::decode_payload(&payload).unwrap();
            assert_eq!(decoded, reference);
        }
    }

    #[test]
    fn test_payload_format() {
        let payload = Reference::member("dbmid:123").encode_payload().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();

        assert_eq!(value["objectType"], "member");
        assert_eq!(value["id"], "dbmid:123");
    }

    #[test]
    fn test_unrecognized_kind_is_invalid() {
        let decoded = Reference::decode_payload(br#"{"objectType":"folder","id":"id:1"}"#).unwrap();

        assert_eq!(
            decoded.object_type(),
            &ObjectKind::Unrecognized("folder".to_string())
        );
        assert_eq!(decoded.id(), "id:1");
        assert!(!decoded.is_valid());
    }

    #[test]
    fn test_known_tag_is_normalized() {
        let reference = Reference::new(ObjectKind::Unrecognized("member".to_string()), "dbmid:1");

        assert_eq!(reference.object_type(), &ObjectKind::Member);
        assert!(reference.is_valid());

        let payload = reference.encode_payload().unwrap();
        let decoded = Reference::decode_payload(&payload).unwrap();
        assert_eq!(decoded, reference);
        assert_eq!(decoded.is_valid(), reference.is_valid());
    }

    #[test]
    fn test_empty_id_is_invalid() {
        let decoded = Reference::decode_payload(br#"{"objectType":"member","id":""}"#).unwrap();
        assert_eq!(decoded.object_type(), &ObjectKind::Member);
        assert!(!decoded.is_valid());

        let missing = Reference::decode_payload(br#"{"objectType":"member"}"#).unwrap();
        assert!(!missing.is_valid());
    }

    #[test]
    fn test_missing_kind_is_invalid() {
        let decoded = Reference::decode_payload(br#"{"id":"dbmid:1"}"#).unwrap();
        assert!(!decoded.object_type().is_recognized());
        assert!(!decoded.is_valid());
    }

    #[test]
    fn test_malformed_payload_fails() {
        let payloads: Vec<&[u8]> = vec![
            &b""[..],
            &b"not json"[..],
            &b"[1,2]"[..],
            &br#"{"objectType":5}"#[..],
        ];

        for payload in payloads {
            let result = Reference::decode_payload(payload);
            assert!(
                matches!(result, Err(DecodeError::Malformed(_))),
                "payload {:?} should be malformed",
                String::from_utf8_lossy(payload)
            );
        }
    }

    #[test]
    fn test_reference_display() {
        assert_eq!(Reference::member("dbmid:9").to_string(), "member:dbmid:9");
    }
}

// =============================================================================
// Item Tests
// =============================================================================

#[cfg(test)]
mod item_tests {
    use super::*;

    #[test]
    fn test_push_item_payload_is_base64() {
        let push_item = PushItem::default().encode_payload(b"hello");
        assert_eq!(push_item.payload.as_deref(), Some("aGVsbG8="));
        assert_eq!(push_item.decode_payload().unwrap(), b"hello");
    }

    #[test]
    fn test_item_from_push_keeps_payload() {
        let push_item = PushItem::default().encode_payload(b"payload");
        let item = Item::from_push("Jane Doe", &push_item);

        assert_eq!(item.name, "Jane Doe");
        assert_eq!(item.decode_payload().unwrap(), b"payload");
    }

    #[test]
    fn test_item_without_payload() {
        let item = Item::new("orphan");
        assert!(matches!(
            item.decode_payload(),
            Err(DecodeError::MissingPayload)
        ));
    }

    #[test]
    fn test_item_with_invalid_base64() {
        let item = Item {
            name: "broken".to_string(),
            payload: Some("***".to_string()),
            ..Default::default()
        };
        assert!(matches!(item.decode_payload(), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_item_json_shape() {
        let item = Item::new("doc").with_payload(b"x");
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["name"], "doc");
        assert_eq!(json["payload"], "eA==");
        assert!(json.get("queue").is_none());
    }

    #[test]
    fn test_push_items_preserve_order() {
        let mut items = PushItems::new();
        assert!(items.is_empty());

        items.add_push_item("b", PushItem::default());
        items.add_push_item("a", PushItem::default());

        let names: Vec<&str> = items.items().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_delete_operation_serialization() {
        let op = ApiOperation::delete_item("item-1");
        let json = serde_json::to_value(&op).unwrap();

        assert_eq!(json["operation"], "delete_item");
        assert_eq!(json["name"], "item-1");
    }

    #[test]
    fn test_checkpoint_batch_defaults() {
        let batch = CheckpointBatch::new(vec![]).with_checkpoint(Some(Checkpoint::new(b"cp".to_vec())));

        assert!(batch.operations.is_empty());
        assert!(!batch.has_more_data);
        assert_eq!(batch.checkpoint.unwrap().as_bytes(), b"cp");
    }
}

// =============================================================================
// Config Tests
// =============================================================================

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_dropbox_config_default() {
        let config = DropboxConfig::default();

        assert!(config.credential_file.is_none());
        assert!(config.team_member_ids.is_empty());
        assert_eq!(config.api_base_url, "https://api.dropboxapi.com");
        assert_eq!(config.oauth_token_url, "https://api.dropbox.com/oauth2/token");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_validate_requires_credential_file() {
        let config = DropboxConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConnectorError::Config { .. })
        ));

        let empty = DropboxConfig {
            credential_file: Some(PathBuf::new()),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_validate_page_size_bounds() {
        let config = DropboxConfig {
            credential_file: Some(PathBuf::from("/etc/dropsearch/credential.json")),
            page_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DropboxConfig {
            page_size: 1000,
            ..config
        };
        assert_eq!(
            config.validate().unwrap(),
            &PathBuf::from("/etc/dropsearch/credential.json")
        );
    }

    #[test]
    fn test_allow_list_normalization() {
        let config = DropboxConfig {
            team_member_ids: vec![
                " dbmid:1 ".to_string(),
                "dbmid:2".to_string(),
                "".to_string(),
                "dbmid:1".to_string(),
            ],
            ..Default::default()
        };

        let allow_list = config.allow_list();
        assert_eq!(allow_list.len(), 2);
        assert!(allow_list.contains("dbmid:1"));
        assert!(allow_list.contains("dbmid:2"));
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: DropboxConfig =
            serde_json::from_str(r#"{"credential_file":"/tmp/cred.json"}"#).unwrap();

        assert_eq!(config.credential_file, Some(PathBuf::from("/tmp/cred.json")));
        assert_eq!(config.page_size, 100);
        assert_eq!(config.retry_delay_ms, 1000);
    }
}

// =============================================================================
// Error Tests
// =============================================================================

#[cfg(test)]
mod error_tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_repository_error_keeps_cause() {
        let err = ConnectorError::repository(
            "Failed to get user IDs",
            ProviderError::transport("connection reset"),
        );

        assert_eq!(err.to_string(), "Repository error: Failed to get user IDs");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "Transport error: connection reset");
    }

    #[test]
    fn test_unsupported_error() {
        let err = ConnectorError::unsupported("get_changes");
        assert!(err.is_unsupported());
        assert_eq!(err.to_string(), "Operation not supported: get_changes");
    }

    #[test]
    fn test_member_status_tags() {
        assert_eq!(MemberStatus::from_tag("active"), MemberStatus::Active);
        assert_eq!(MemberStatus::from_tag("suspended"), MemberStatus::Suspended);
        assert_eq!(MemberStatus::from_tag("something_new"), MemberStatus::Other);
    }
}
