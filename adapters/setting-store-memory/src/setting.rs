//! Setting rows kept in memory
//!
//! Rows are matched on the exact `(company_id, user_id, name)` triple, like a
//! table with a unique index over those columns.

use stratum::prelude::*;
use stratum::setting_store::SettingRecord;

fn same_row(row: &SettingRecord, record: &SettingRecord) -> bool {
	row.company_id == record.company_id && row.user_id == record.user_id && row.name == record.name
}

/// Read a single setting by scope and name
pub(crate) fn read(
	rows: &[SettingRecord],
	company_id: Option<CompanyId>,
	user_id: Option<UserId>,
	name: &str,
) -> Option<SettingRecord> {
	rows.iter()
		.find(|row| row.company_id == company_id && row.user_id == user_id && &*row.name == name)
		.cloned()
}

/// List all settings of one scope
pub(crate) fn list(
	rows: &[SettingRecord],
	company_id: Option<CompanyId>,
	user_id: Option<UserId>,
) -> Vec<SettingRecord> {
	rows.iter()
		.filter(|row| row.company_id == company_id && row.user_id == user_id)
		.cloned()
		.collect()
}

/// Insert a new setting. Fails if the row already exists.
pub(crate) fn create(rows: &mut Vec<SettingRecord>, record: &SettingRecord) -> StResult<()> {
	if rows.iter().any(|row| same_row(row, record)) {
		warn!("Setting '{}' already stored for {}", record.name, record.scope());
		return Err(Error::DbError);
	}
	rows.push(record.clone());
	Ok(())
}

/// Replace the value of an existing setting
pub(crate) fn update(rows: &mut [SettingRecord], record: &SettingRecord) -> StResult<()> {
	let row = rows.iter_mut().find(|row| same_row(row, record)).ok_or(Error::NotFound)?;
	row.value.clone_from(&record.value);
	Ok(())
}

/// Delete an existing setting
pub(crate) fn delete(rows: &mut Vec<SettingRecord>, record: &SettingRecord) -> StResult<()> {
	let pos = rows.iter().position(|row| same_row(row, record)).ok_or(Error::NotFound)?;
	rows.remove(pos);
	Ok(())
}

// vim: ts=4
