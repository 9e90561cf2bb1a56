pub mod naming;
pub mod tables;
pub mod synchronizer;
pub mod ddl;
pub mod upserter;
pub mod dropper;
pub mod manager;
