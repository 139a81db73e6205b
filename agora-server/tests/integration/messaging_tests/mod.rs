mod test_chat_and_move;
