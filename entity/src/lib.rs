//! Kontrakanku database entities.
//!
//! Table and column names follow the existing schema (`properti`, `penyewa`,
//! `pembayaran`, `riwayat_pembayaran`), field names are english.

pub mod contract;
pub mod installment;
pub mod tenant;
pub mod unit;
