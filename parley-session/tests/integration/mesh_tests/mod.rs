mod test_broadcast_scopes;
mod test_host_initialize_lists;
