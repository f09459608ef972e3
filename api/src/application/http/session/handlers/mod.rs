pub mod get_session;
