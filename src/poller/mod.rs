mod sync_poller;

pub use sync_poller::start_polling;
