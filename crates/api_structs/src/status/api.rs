use serde::{Deserialize, Serialize};

pub mod get_status {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct APIResponse {
        pub message: String,
    }
}
