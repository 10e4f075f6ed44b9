mod category;
mod receipts;
mod results;
mod tax_tables;
mod transactions;

pub use category::{Category, Week};
pub use receipts::{SaleRecord, SuperReceipt, SuperSaleRecord, TaxInvoice, is_discount_eligible};
pub use results::{SimulationOutput, SimulationResult, TaxYearAggregate};
pub use tax_tables::{BracketTable, Indexable, RepaymentSchedule, TaxBracket, YearlyTables};
pub use transactions::{
    CashStream, Command, Contribution, Transaction, TransactionLog, WeekCursor,
};
