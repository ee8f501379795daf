//! Company store trait. Resolves the implicit company of single-tenant deployments.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait CompanyStore: Debug + Send + Sync {
	/// The company that owns all data when multi-tenancy is disabled
	async fn default_company_id(&self) -> StResult<CompanyId>;

	fn default_company_id_sync(&self) -> StResult<CompanyId>;
}

// vim: ts=4
