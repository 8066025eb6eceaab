pub mod builder;
pub mod dispatcher;
pub mod event;
pub mod listener;
pub mod prefix;
