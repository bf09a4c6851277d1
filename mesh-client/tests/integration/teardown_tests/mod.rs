mod test_end_call;
