//! Tests for the sample applications and the script driver.
