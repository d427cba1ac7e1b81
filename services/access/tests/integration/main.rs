mod helpers;

mod account_test;
mod approval_test;
