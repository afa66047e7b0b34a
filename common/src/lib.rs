pub mod macros;

agg_mod![errors, ledger, models, utils];
