mod test_joiner_bootstraps_through_host;
