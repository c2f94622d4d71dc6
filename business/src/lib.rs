pub mod application {
    pub mod shared {
        pub mod local_state;
        pub mod persisted_state;
        pub mod synced_collection;
    }
    pub mod collection {
        pub mod store;
    }
    pub mod grocery {
        pub mod store;
    }
    pub mod meal_plan {
        pub mod store;
    }
    pub mod pantry {
        pub mod store;
    }
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod shared {
        pub mod value_objects;
    }
    pub mod category {
        pub mod categorizer;
        pub mod model;
    }
    pub mod collection {
        pub mod errors;
        pub mod model;
    }
    pub mod grocery {
        pub mod errors;
        pub mod model;
    }
    pub mod meal_plan {
        pub mod model;
        pub mod value_objects;
    }
    pub mod pantry {
        pub mod errors;
        pub mod model;
    }
    pub mod recipe {
        pub mod errors;
        pub mod model;
        pub mod services;
    }
    pub mod sync {
        pub mod remote;
        pub mod storage;
    }
}
