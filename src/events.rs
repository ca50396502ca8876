use alloy::rpc::types::Log;
use alloy::sol;
use alloy::sol_types::{self, SolEvent};

sol! {
    event Donate(
        address indexed donor,
        address indexed recipient,
        address erc20Token,
        uint256 netDonation,
        uint256 commission,
        string donorName,
        string message
    );
}

/// Decodes a raw `Donate` log into its typed form.
///
/// Topic[1] and topic[2] carry donor and recipient; the token address is
/// the first field of the event body. An earlier revision of the indexer
/// read the token address out of topic[2], silently recording the
/// recipient in its place. The body field is the authoritative source.
pub fn decode_donate_event(log: &Log) -> sol_types::Result<Donate> {
    let log_data = log.data();
    Donate::decode_raw_log(log.topics(), &log_data.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256, Bytes, U256, address};

    const CONTRACT: Address = address!("00000000000000000000000000000000000000c1");
    const DONOR: Address = address!("000000000000000000000000000000000000d001");
    const RECIPIENT: Address = address!("000000000000000000000000000000000000e002");
    const TOKEN: Address = address!("000000000000000000000000000000000000f003");

    fn donate_log(topics: Vec<B256>, data: Bytes) -> Log {
        Log {
            inner: alloy_primitives::Log::new_unchecked(CONTRACT, topics, data),
            block_number: Some(42),
            log_index: Some(0),
            transaction_hash: Some(B256::repeat_byte(0x11)),
            ..Default::default()
        }
    }

    fn encoded_donate(net: u64, commission: u64, donor_name: &str, message: &str) -> Log {
        let event = Donate {
            donor: DONOR,
            recipient: RECIPIENT,
            erc20Token: TOKEN,
            netDonation: U256::from(net),
            commission: U256::from(commission),
            donorName: donor_name.to_string(),
            message: message.to_string(),
        };
        let topics = vec![
            Donate::SIGNATURE_HASH,
            DONOR.into_word(),
            RECIPIENT.into_word(),
        ];
        donate_log(topics, Bytes::from(event.encode_data()))
    }

    #[test]
    fn decodes_donation_fields_from_topics_and_body() {
        let log = encoded_donate(1500, 50, "alice", "gg");
        let event = decode_donate_event(&log).unwrap();

        assert_eq!(event.donor, DONOR);
        assert_eq!(event.recipient, RECIPIENT);
        assert_eq!(event.netDonation, U256::from(1500u64));
        assert_eq!(event.commission, U256::from(50u64));
        assert_eq!(event.donorName, "alice");
        assert_eq!(event.message, "gg");
    }

    #[test]
    fn token_address_comes_from_body_not_recipient_topic() {
        let log = encoded_donate(1, 0, "bob", "");
        let event = decode_donate_event(&log).unwrap();

        assert_eq!(event.erc20Token, TOKEN);
        assert_ne!(event.erc20Token, event.recipient);
    }

    #[test]
    fn empty_strings_decode() {
        let log = encoded_donate(7, 3, "", "");
        let event = decode_donate_event(&log).unwrap();
        assert!(event.donorName.is_empty());
        assert!(event.message.is_empty());
    }

    #[test]
    fn truncated_body_fails_to_decode() {
        let mut good = encoded_donate(1500, 50, "alice", "gg");
        let data = good.data().data.clone();
        let topics = good.topics().to_vec();
        let truncated = Bytes::from(data[..data.len() / 2].to_vec());
        good.inner = alloy_primitives::Log::new_unchecked(CONTRACT, topics, truncated);
        assert!(decode_donate_event(&good).is_err());
    }

    #[test]
    fn missing_indexed_topics_fail_to_decode() {
        let event = Donate {
            donor: DONOR,
            recipient: RECIPIENT,
            erc20Token: TOKEN,
            netDonation: U256::from(1u64),
            commission: U256::ZERO,
            donorName: String::new(),
            message: String::new(),
        };
        let log = donate_log(
            vec![Donate::SIGNATURE_HASH],
            Bytes::from(event.encode_data()),
        );
        assert!(decode_donate_event(&log).is_err());
    }
}
