pub mod data {
    pub mod datasources {
        pub mod verify_receipt_datasource;
        pub(crate) mod utils;
    }
    pub mod models {
        pub mod verify_receipt {
            pub mod request_body_model;
            pub(crate) mod response_body_model;
        }
    }
    pub mod repositories {
        pub mod receipt_repository_impl;
    }
}

pub mod domain {
    pub mod entities {
        pub mod environment;
        pub mod receipt_response;
        pub mod transaction;
        pub mod vendor_status;
    }
    pub mod repositories {
        pub mod receipt_repository;
    }
}

pub mod config;
pub mod errors;
pub mod util;
