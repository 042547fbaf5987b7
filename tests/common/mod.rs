#![allow(dead_code)]

use std::sync::Once;

use chrono::{DateTime, TimeZone, Utc};
use mail_threading::{Message, Thread};

static LOGGER: Once = Once::new();

pub fn init_logger() {
    LOGGER.call_once(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .is_test(true)
            .try_init();
    });
}

pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
}

pub fn message(id: &str, subject: &str, sent_at: DateTime<Utc>) -> Message {
    Message::new(id, subject, sent_at).with_from(format!("{id}@example.com"))
}

/// Message ids per thread, threads in output order.
pub fn membership(threads: &[Thread]) -> Vec<Vec<String>> {
    threads
        .iter()
        .map(|thread| {
            thread
                .messages
                .iter()
                .map(|message| message.message_id.clone())
                .collect()
        })
        .collect()
}
