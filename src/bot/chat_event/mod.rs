pub mod chat_event;
