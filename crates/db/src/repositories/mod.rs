pub mod snapshot_slot;
