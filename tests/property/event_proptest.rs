//! Property-based tests for socket frame decoding

use proptest::prelude::*;
use talks::shared::event::TypingRequest;
use talks::shared::ClientEvent;
use uuid::Uuid;

proptest! {
    #[test]
    fn test_decode_never_panics(frame in ".*") {
        let _ = ClientEvent::decode(&frame);
    }

    #[test]
    fn test_typing_frames_decode(user in any::<u128>(), conversation in any::<u128>(), start in any::<bool>()) {
        let user_id = Uuid::from_u128(user);
        let conversation_id = Uuid::from_u128(conversation);
        let name = if start { "startTyping" } else { "stopTyping" };
        let frame = serde_json::json!({
            "event": name,
            "data": {"userId": user_id, "conversationId": conversation_id}
        })
        .to_string();

        let request = TypingRequest { user_id, conversation_id };
        let decoded = ClientEvent::decode(&frame).unwrap();
        prop_assert_eq!(decoded.name(), name);
        match decoded {
            ClientEvent::StartTyping(r) | ClientEvent::StopTyping(r) => prop_assert_eq!(r, request),
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }
}
